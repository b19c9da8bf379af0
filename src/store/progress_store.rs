use std::{
    future::Future,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Result;
use chrono::NaiveDate;
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncWriteExt},
};
use tracing::{debug, warn};

use crate::utils::paths;

use super::state::ProjectState;

/// Interface for abstracting persistence of a project's progress.
pub trait ProgressStore {
    /// Reads the current state. A missing file means a brand-new project; an
    /// unreadable or undecodable one is reported and replaced by a fresh
    /// default. Callers never see an error here.
    fn load(&self, today: NaiveDate) -> impl Future<Output = ProjectState>;

    /// Overwrites the stored document with `state`. Failures are recoverable:
    /// the caller keeps its in-memory state and tells the user.
    fn save(&self, state: &ProjectState) -> impl Future<Output = Result<()>>;
}

/// The main realization of [ProgressStore]: one pretty-printed JSON document
/// per project, guarded by advisory file locks so the tracker and one-shot
/// commands touching the same project don't tear it.
pub struct JsonProgressStore {
    path: PathBuf,
}

impl JsonProgressStore {
    pub fn new(project_root: &Path) -> Self {
        Self {
            path: paths::state_path(project_root),
        }
    }

    async fn read_locked(&self) -> std::io::Result<String> {
        let mut file = File::open(&self.path).await?;
        file.lock_shared()?;
        let mut content = String::new();
        let result = file.read_to_string(&mut content).await;
        file.unlock_async().await?;
        result?;
        Ok(content)
    }

    async fn write_locked(&self, state: &ProjectState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = File::options()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .await?;

        // Truncation happens under the exclusive lock, not at open time, so
        // a concurrent reader never observes an empty document.
        file.lock_exclusive()?;
        let result = Self::overwrite(&mut file, state).await;
        file.unlock_async().await?;
        result
    }

    async fn overwrite(file: &mut File, state: &ProjectState) -> Result<()> {
        file.set_len(0).await?;
        let mut buffer = serde_json::to_vec_pretty(state)?;
        buffer.push(b'\n');
        file.write_all(&buffer).await?;
        file.flush().await?;
        Ok(())
    }
}

impl ProgressStore for JsonProgressStore {
    async fn load(&self, today: NaiveDate) -> ProjectState {
        let content = match self.read_locked().await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No progress file at {:?}, starting fresh", self.path);
                return ProjectState::fresh(today);
            }
            Err(e) => {
                warn!("Couldn't read progress file {:?}: {e}", self.path);
                return ProjectState::fresh(today);
            }
        };

        match serde_json::from_str(&content) {
            Ok(state) => state,
            Err(e) => {
                // Might happen after a shutdown cut a write short.
                warn!("Unparsable progress file {:?}: {e}", self.path);
                ProjectState::fresh(today)
            }
        }
    }

    async fn save(&self, state: &ProjectState) -> Result<()> {
        self.write_locked(state).await
    }
}
