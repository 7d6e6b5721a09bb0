//! # botmig-codemod
//!
//! Python source rewriting for the `BotAI` -> `AresBot` migration.
//!
//! Everything here works on the concrete syntax tree produced by ast-grep
//! (tree-sitter-python) rather than on line patterns, so comments and string
//! literals never produce false matches and method bodies are found through
//! the grammar's `block` nodes instead of indentation scanning. Rewrites are
//! byte-range splices applied back to front, leaving every other byte of the
//! file untouched.
//!
//! - [`entry_point`]: prepend the module search-path bootstrap to the entry script
//! - [`locator`]: follow the entry script's imports to the file defining the agent
//! - [`transform`]: swap the base class and chain lifecycle hooks to it

mod edits;
pub mod entry_point;
mod error;
pub mod locator;
pub mod parser;
pub mod transform;

pub use entry_point::{EntryPatch, patch_entry_point};
pub use error::CodemodError;
pub use locator::{BotLocator, Located, LocatedVia, MAX_REEXPORT_HOPS};
pub use transform::{Transformed, transform_file, transform_source};
