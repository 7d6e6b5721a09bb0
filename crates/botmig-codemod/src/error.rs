//! Codemod error types.

use std::path::PathBuf;

/// Errors raised while reading, rewriting, or writing Python sources.
#[derive(Debug, thiserror::Error)]
pub enum CodemodError {
    #[error("IO error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file does not parse cleanly; it is left untouched.
    #[error("'{}' is not valid Python (first syntax error on line {line})", .path.display())]
    Syntax { path: PathBuf, line: usize },
}

impl CodemodError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
