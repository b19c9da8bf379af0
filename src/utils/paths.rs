use std::path::{Path, PathBuf};

/// Everything penpace keeps for a project lives under this directory,
/// relative to the project root.
pub const DATA_DIR: &str = ".penpace";

pub fn data_dir(project_root: &Path) -> PathBuf {
    project_root.join(DATA_DIR)
}

pub fn state_path(project_root: &Path) -> PathBuf {
    data_dir(project_root).join("progress.json")
}

pub fn config_path(project_root: &Path) -> PathBuf {
    data_dir(project_root).join("config.json")
}

pub fn logs_path(project_root: &Path) -> PathBuf {
    data_dir(project_root).join("logs")
}

/// Name under which the project shows up in stats. Resolves relative roots
/// like `.` first; falls back to the full path for roots like `/` that have
/// no final component.
pub fn project_name(project_root: &Path) -> String {
    let root = project_root
        .canonicalize()
        .unwrap_or_else(|_| project_root.to_path_buf());
    root.file_name()
        .map(|v| v.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string())
}
