//! Document upload types.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The one file waiting to be uploaded into the active session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingFile {
    pub path: PathBuf,
    /// Display name, taken from the path's file name
    pub name: String,
}

impl PendingFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = display_name(&path);
        Self { path, name }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Successful upload response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    /// Server-provided status text, if any
    #[serde(default)]
    pub message: Option<String>,
}
