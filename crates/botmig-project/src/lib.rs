//! # botmig-project
//!
//! The file-system and process side of a migration: everything that touches
//! the project tree other than Python source rewriting.
//!
//! External commands go through the [`CommandRunner`] trait so the steps can
//! be exercised without `git` or `poetry` installed. The `gix` dependency is
//! isolated here; only the version stamp reads repository metadata.

mod error;
pub mod fetch;
pub mod install;
pub mod preflight;
pub mod reconcile;
pub mod remove;
pub mod runner;
pub mod stamp;

pub use error::ProjectError;
pub use fetch::{Fetched, discard_staging, fetch_template};
pub use install::install_dependencies;
pub use preflight::{ToolVersion, check_tools};
pub use reconcile::{MovedEntry, reconcile, validate_entries};
pub use remove::remove_all;
pub use runner::{CommandOutput, CommandRunner, SystemRunner};
pub use stamp::{VersionStamp, write_version_stamp};
