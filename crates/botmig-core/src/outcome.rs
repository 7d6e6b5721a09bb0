//! Codemod outcome types. Used only for reporting; never persisted.

use std::path::PathBuf;

use serde::Serialize;

/// One base-call injected into a hook body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookInjection {
    pub hook: String,
    /// 1-based line of the hook signature in the original file.
    pub line: usize,
    /// The synthesized call, without indentation.
    pub call: String,
    /// The hook was declared with plain `def` and had `async` added.
    pub made_async: bool,
}

/// Result of running the source transformer over one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformOutcome {
    pub path: PathBuf,
    pub changed: bool,
    pub import_rewritten: bool,
    pub bases_rewritten: usize,
    /// Class name used for call synthesis.
    pub class_name: String,
    /// `class_name` came from the configured default, not the source.
    pub class_name_defaulted: bool,
    pub injected: Vec<HookInjection>,
    /// Recognized hooks that already chain to the base implementation.
    pub already_chained: Vec<String>,
    /// Classes deriving from neither base that still had calls injected.
    pub unmatched_classes: Vec<String>,
}

impl TransformOutcome {
    #[must_use]
    pub fn injected_hooks(&self) -> Vec<&str> {
        self.injected.iter().map(|i| i.hook.as_str()).collect()
    }
}
