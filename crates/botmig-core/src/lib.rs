//! # botmig-core
//!
//! Data model shared by every botmig crate.
//!
//! All entities are transient: they are computed fresh on each run and the
//! only state that survives an invocation is the project's file system.
//!
//! - [`RequiredEntry`] / [`EntryKind`]: paths the fetched template must provide
//! - [`LifecycleHook`]: the closed set of callbacks the codemod recognizes
//! - [`ImportBinding`]: an imported name resolved to the file defining it
//! - [`TransformOutcome`] / [`HookInjection`]: per-file codemod report

pub mod entry;
pub mod hooks;
pub mod imports;
pub mod outcome;

pub use entry::{EntryKind, RequiredEntry};
pub use hooks::LifecycleHook;
pub use imports::ImportBinding;
pub use outcome::{HookInjection, TransformOutcome};
