use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Stored challenge label while no challenge is active.
pub const NO_CHALLENGE: &str = "No challenge";

/// The durable per-project document. Field names are the on-disk contract,
/// shared with the editor plugins that read the file directly.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProjectState {
    /// Target characters per day. `0` means no active challenge.
    pub goal: u64,
    /// Committed characters written today.
    pub daily_count: u64,
    /// Local calendar date of the last rollover check.
    pub last_update_date: NaiveDate,
    pub challenge_name: Arc<str>,
    /// One record per completed past day, append-only. Never holds the
    /// current day before rollover.
    pub history: Vec<DayRecord>,
    /// Tentative additions, oldest first.
    pub pending_chars: Vec<PendingEntry>,
    pub tracking_paused: bool,
}

/// A finished day archived by rollover.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub count: u64,
}

/// Characters tentatively added by one change event, still revocable until
/// they age out of the grace period.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct PendingEntry {
    pub count: u64,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
}

impl ProjectState {
    pub fn fresh(today: NaiveDate) -> Self {
        Self {
            goal: 0,
            daily_count: 0,
            last_update_date: today,
            challenge_name: NO_CHALLENGE.into(),
            history: Vec::new(),
            pending_chars: Vec::new(),
            tracking_paused: false,
        }
    }

    /// Archives the previous day and zeroes the counter when the calendar
    /// date moved on. Returns whether a new day started; calling again on
    /// the same day is a no-op.
    pub fn rollover(&mut self, today: NaiveDate) -> bool {
        if self.last_update_date == today {
            return false;
        }
        if self.daily_count > 0 {
            self.history.push(DayRecord {
                date: self.last_update_date,
                count: self.daily_count,
            });
        }
        self.daily_count = 0;
        self.last_update_date = today;
        true
    }

    pub fn pending_sum(&self) -> u64 {
        self.pending_chars.iter().map(|v| v.count).sum()
    }

    /// Count shown to the user: committed plus still-pending characters.
    pub fn display_count(&self) -> u64 {
        self.daily_count + self.pending_sum()
    }

    pub fn lifetime_total(&self) -> u64 {
        self.history.iter().map(|v| v.count).sum::<u64>() + self.daily_count
    }
}
