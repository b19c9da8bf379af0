use anyhow::Result;
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    sync::mpsc,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::events::BufferEvent;

/// Reads the editor feed line by line and forwards decoded events to the
/// tracker. EOF means the editor hung up, which winds the whole process
/// down.
pub struct EventFeed<R> {
    source: R,
    next: mpsc::Sender<BufferEvent>,
    shutdown: CancellationToken,
}

impl<R: AsyncRead + Unpin> EventFeed<R> {
    pub fn new(source: R, next: mpsc::Sender<BufferEvent>, shutdown: CancellationToken) -> Self {
        Self {
            source,
            next,
            shutdown,
        }
    }

    pub async fn run(self) -> Result<()> {
        let mut lines = BufReader::new(self.source).lines();
        loop {
            let line = tokio::select! {
                // Cancellation drops the sender, which in turn stops the
                // tracker loop.
                _ = self.shutdown.cancelled() => return Ok(()),
                line = lines.next_line() => line?,
            };
            let Some(line) = line else {
                self.shutdown.cancel();
                return Ok(());
            };

            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<BufferEvent>(&line) {
                Ok(event) => {
                    debug!("Forwarding event {:?}", event);
                    if self.next.send(event).await.is_err() {
                        // Receiver already shut down.
                        return Ok(());
                    }
                }
                Err(e) => {
                    // A malformed line shouldn't take down the tracker.
                    warn!("Skipping undecodable feed line {line:?}: {e}");
                }
            }
        }
    }
}
