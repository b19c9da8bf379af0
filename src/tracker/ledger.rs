use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::{
    config::TrackerConfig,
    store::state::{PendingEntry, ProjectState},
};

use super::challenge;

/// The provisional-to-committed accounting engine. Raw buffer-size deltas
/// become pending entries; deletions inside the grace period silently
/// retract them; entries that outlive the period are promoted into the
/// durable daily count by the periodic sweep.
pub struct PendingLedger {
    grace_period: Duration,
    max_event_chars: u64,
}

/// What one commit sweep did to the state.
#[derive(Debug, PartialEq, Eq)]
pub struct CommitOutcome {
    pub committed: u64,
    pub goal_reached: bool,
}

impl PendingLedger {
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            grace_period: Duration::seconds(config.undo_grace_period_seconds as i64),
            max_event_chars: config.max_tracked_chars_per_event,
        }
    }

    /// Applies one observed size change. A positive delta appends a pending
    /// entry, capped at `maxTrackedCharsPerEvent`; anything beyond the cap
    /// is dropped from tracking rather than counted, so a pasted chapter
    /// doesn't score like typed text. A negative delta retracts recent
    /// pending entries. Zero is a no-op.
    pub fn observe(&self, state: &mut ProjectState, delta: i64, now: DateTime<Utc>) {
        if delta > 0 {
            let count = (delta as u64).min(self.max_event_chars);
            if count < delta as u64 {
                debug!("Capping addition of {delta} to {count}");
            }
            state.pending_chars.push(PendingEntry {
                count,
                timestamp: now,
            });
        } else if delta < 0 {
            self.retract(state, delta.unsigned_abs(), now);
        }
    }

    /// Reconciles a deletion against pending entries, newest first. Only
    /// entries still younger than the grace period are touched; the walk
    /// stops at the first older entry. A remainder that runs out of young
    /// entries corresponds to committed (or never-tracked) text and is
    /// dropped without correcting the daily count.
    fn retract(&self, state: &mut ProjectState, mut to_remove: u64, now: DateTime<Utc>) {
        while to_remove > 0 {
            let Some(entry) = state.pending_chars.last_mut() else {
                break;
            };
            if now - entry.timestamp >= self.grace_period {
                break;
            }
            if entry.count <= to_remove {
                to_remove -= entry.count;
                state.pending_chars.pop();
            } else {
                entry.count -= to_remove;
                to_remove = 0;
            }
        }
    }

    /// Promotes entries older than the grace period into the daily count,
    /// through the goal-checking mutator so a commit can complete the
    /// challenge exactly like a bonus would.
    pub fn commit_aged(&self, state: &mut ProjectState, now: DateTime<Utc>) -> CommitOutcome {
        let mut committed = 0;
        state.pending_chars.retain(|entry| {
            if now - entry.timestamp > self.grace_period {
                committed += entry.count;
                false
            } else {
                true
            }
        });

        let goal_reached = committed > 0 && challenge::apply_daily_increment(state, committed);
        CommitOutcome {
            committed,
            goal_reached,
        }
    }
}
