//! Import bindings discovered in the entry script.

use std::path::PathBuf;

use serde::Serialize;

/// An imported name mapped to the file that defines it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportBinding {
    /// Dotted module path as written, e.g. `bot.main`.
    pub module: String,
    /// Imported identifier, e.g. `CompetitiveBot`.
    pub name: String,
    /// Files probed for `module`, in probing order.
    pub candidates: Vec<PathBuf>,
    /// The defining file; `None` when no candidate exists.
    pub resolved: Option<PathBuf>,
    /// Number of re-export hops followed to reach `resolved`.
    pub hops: usize,
}

impl ImportBinding {
    #[must_use]
    pub fn new(module: &str, name: &str) -> Self {
        Self {
            module: module.to_string(),
            name: name.to_string(),
            candidates: Vec::new(),
            resolved: None,
            hops: 0,
        }
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }
}
