//! The long-running side of penpace. `penpace track` wires a stdin feed of
//! buffer events into the [TrackerModule], which owns the in-memory state
//! handle, the pending-delta ledger, and a periodic sweep that commits aged
//! pending characters.

use std::{collections::HashMap, path::Path, sync::Arc, time::Duration};

use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::{
    config::TrackerConfig,
    editor::{pipe::PipeUi, EditorUi, NoticeLevel},
    store::{
        progress_store::{JsonProgressStore, ProgressStore},
        state::ProjectState,
    },
    utils::clock::{Clock, DefaultClock},
};

use events::BufferEvent;
use feed::EventFeed;
use ledger::PendingLedger;
use status::status_line;

pub mod challenge;
pub mod events;
pub mod feed;
pub mod ledger;
pub mod status;

const SWEEP_INTERVAL: Duration = Duration::from_secs(5);

/// Entry point for `penpace track`: events in on stdin, status pushes and
/// notices out on stdout, until the editor hangs up or ctrl-c arrives.
pub async fn run_tracker(project_root: &Path) -> Result<()> {
    let config = TrackerConfig::load(project_root);

    let (sender, receiver) = mpsc::channel::<BufferEvent>(10);
    let shutdown_token = CancellationToken::new();

    let feed = EventFeed::new(tokio::io::stdin(), sender, shutdown_token.clone());
    let tracker =
        create_tracker(project_root, config, receiver, PipeUi::stdout(), DefaultClock).await;

    let (_, feed_result, tracker_result) = tokio::join!(
        detect_shutdown(shutdown_token),
        feed.run(),
        tracker.run(),
    );

    if let Err(feed_result) = feed_result {
        error!("Event feed got an error {:?}", feed_result);
    }

    if let Err(tracker_result) = tracker_result {
        error!("Tracker module got an error {:?}", tracker_result);
    }

    Ok(())
}

async fn create_tracker<U: EditorUi>(
    project_root: &Path,
    config: TrackerConfig,
    receiver: mpsc::Receiver<BufferEvent>,
    ui: U,
    clock: impl Clock,
) -> TrackerModule<JsonProgressStore, U> {
    let store = JsonProgressStore::new(project_root);
    let state = store.load(clock.today()).await;
    TrackerModule::new(store, state, config, receiver, ui, Box::new(clock))
}

/// Completes once the process should wind down: either ctrl-c arrives here
/// and cancels the token, or another part (feed EOF) cancelled it already.
async fn detect_shutdown(cancellation: CancellationToken) {
    tokio::select! {
        _ = tokio::signal::ctrl_c() => cancellation.cancel(),
        _ = cancellation.cancelled() => (),
    }
}

/// Owns one project's live state: applies buffer events through the ledger,
/// persists write-through, and pushes status lines to the host.
pub struct TrackerModule<S, U> {
    store: S,
    state: ProjectState,
    config: TrackerConfig,
    ledger: PendingLedger,
    receiver: mpsc::Receiver<BufferEvent>,
    ui: U,
    clock: Box<dyn Clock>,
    /// Last observed character count per buffer, reset on every (re)entry.
    baselines: HashMap<Arc<str>, u64>,
}

impl<S: ProgressStore, U: EditorUi> TrackerModule<S, U> {
    pub fn new(
        store: S,
        state: ProjectState,
        config: TrackerConfig,
        receiver: mpsc::Receiver<BufferEvent>,
        ui: U,
        clock: Box<dyn Clock>,
    ) -> Self {
        let ledger = PendingLedger::new(&config);
        Self {
            store,
            state,
            config,
            ledger,
            receiver,
            ui,
            clock,
            baselines: HashMap::new(),
        }
    }

    /// Executes the tracker event loop until the feed closes the channel.
    pub async fn run(mut self) -> Result<()> {
        let mut sweep_point = self.clock.instant() + SWEEP_INTERVAL;
        loop {
            tokio::select! {
                event = self.receiver.recv() => {
                    match event {
                        Some(event) => self.handle_event(event).await,
                        None => break,
                    }
                }
                _ = self.clock.sleep_until(sweep_point) => {
                    self.sweep().await;
                    sweep_point += SWEEP_INTERVAL;
                }
            }
        }

        // Commit whatever aged while the loop was winding down.
        self.sweep().await;
        self.receiver.close();
        Ok(())
    }

    async fn handle_event(&mut self, event: BufferEvent) {
        if !self.config.is_tracked(Path::new(&**event.path())) {
            debug!("Ignoring event for untracked buffer {}", event.path());
            return;
        }
        match event {
            BufferEvent::BufferEntered { path, chars } => self.enter_buffer(path, chars).await,
            BufferEvent::TextChanged { path, chars } => self.observe_change(path, chars).await,
        }
    }

    /// Buffer (re)entry is the single point where the on-disk document is
    /// re-read; afterwards the in-memory handle is authoritative until the
    /// next entry.
    async fn enter_buffer(&mut self, path: Arc<str>, chars: u64) {
        let today = self.clock.today();
        let mut state = self.store.load(today).await;
        if state.rollover(today) {
            info!("Rolled over into {today}");
            self.ui
                .notify(NoticeLevel::Info, "A new writing day started");
        }
        self.state = state;
        self.persist().await;
        self.baselines.insert(path, chars);
        self.push_status();
    }

    async fn observe_change(&mut self, path: Arc<str>, chars: u64) {
        // The baseline moves on every event, paused or not; pause only
        // suppresses the pending entry. Otherwise resuming would read the
        // whole accumulated difference as one giant edit.
        let Some(last_observed) = self.baselines.insert(path.clone(), chars) else {
            debug!("No baseline for {path}, trusting counts from here on");
            return;
        };

        let delta = chars as i64 - last_observed as i64;
        if delta == 0 || self.state.tracking_paused {
            return;
        }

        self.ledger
            .observe(&mut self.state, delta, self.clock.time());
        self.persist().await;
        self.push_status();
    }

    async fn sweep(&mut self) {
        let outcome = self.ledger.commit_aged(&mut self.state, self.clock.time());
        if outcome.committed == 0 {
            return;
        }
        info!("Committed {} character(s)", outcome.committed);
        self.persist().await;
        if outcome.goal_reached {
            self.ui.notify(
                NoticeLevel::Info,
                &format!("Daily goal reached: {} characters!", self.state.goal),
            );
        }
        self.push_status();
    }

    async fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.state).await {
            error!("Couldn't persist progress: {e:?}");
            self.ui
                .notify(NoticeLevel::Error, "Couldn't save writing progress");
        }
    }

    fn push_status(&mut self) {
        self.ui.show_status(&status_line(&self.state));
    }
}
