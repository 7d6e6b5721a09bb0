use std::path::PathBuf;

use botmig_core::EntryKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("required tools not available: {}", .tools.join(", "))]
    MissingTool { tools: Vec<String> },

    /// The fetched template lacks a required entry. Nothing has been moved.
    #[error("template entry '{}' is missing from the fetched repository", .path.display())]
    MissingEntry { path: PathBuf },

    #[error("template entry '{}' is not a {expected}", .path.display())]
    EntryKindMismatch { path: PathBuf, expected: EntryKind },

    #[error("'{program}' failed ({status}): {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("failed to start '{program}': {source}")]
    CommandSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("git error: {0}")]
    Git(String),
}

impl ProjectError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
