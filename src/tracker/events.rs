use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// One observation forwarded by the editor side of the pipe. `chars` is the
/// buffer's new total character count, never a delta. Deltas are derived
/// here against the per-buffer baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BufferEvent {
    /// A document became the active buffer.
    BufferEntered { path: Arc<str>, chars: u64 },
    /// The active buffer's content changed.
    TextChanged { path: Arc<str>, chars: u64 },
}

impl BufferEvent {
    pub fn path(&self) -> &Arc<str> {
        match self {
            BufferEvent::BufferEntered { path, .. } => path,
            BufferEvent::TextChanged { path, .. } => path,
        }
    }
}
