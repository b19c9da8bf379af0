use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::utils::paths;

/// Upper bound for `undoGracePeriodSeconds`; larger configured values are
/// capped to a day.
const MAX_GRACE_PERIOD_SECONDS: u64 = 86_400;

/// Per-project options, read from `.penpace/config.json`. Every field has a
/// default so a partial (or absent) file is fine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackerConfig {
    /// Extensions that activate tracking when such a buffer is entered.
    pub tracked_file_types: Vec<String>,
    /// How long an addition stays revocable before it commits.
    pub undo_grace_period_seconds: u64,
    /// Cap on how many characters a single change event may contribute.
    pub max_tracked_chars_per_event: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            tracked_file_types: ["md", "markdown", "txt", "tex", "org"]
                .map(str::to_owned)
                .to_vec(),
            undo_grace_period_seconds: 30,
            max_tracked_chars_per_event: 50,
        }
    }
}

impl TrackerConfig {
    /// Reads the project's config, falling back to defaults when the file is
    /// missing or unreadable. A file that exists but doesn't parse is
    /// reported, then ignored.
    pub fn load(project_root: &Path) -> Self {
        let path = paths::config_path(project_root);
        let Ok(content) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        match serde_json::from_str::<Self>(&content) {
            Ok(mut config) => {
                if config.undo_grace_period_seconds > MAX_GRACE_PERIOD_SECONDS {
                    warn!(
                        "Capping undoGracePeriodSeconds from {} to {MAX_GRACE_PERIOD_SECONDS}",
                        config.undo_grace_period_seconds
                    );
                    config.undo_grace_period_seconds = MAX_GRACE_PERIOD_SECONDS;
                }
                config
            }
            Err(e) => {
                warn!("Ignoring unparsable config {path:?}: {e}");
                Self::default()
            }
        }
    }

    pub fn is_tracked(&self, buffer_path: &Path) -> bool {
        let Some(extension) = buffer_path.extension().and_then(|v| v.to_str()) else {
            return false;
        };
        let extension = extension.to_ascii_lowercase();
        self.tracked_file_types.iter().any(|v| *v == extension)
    }
}
