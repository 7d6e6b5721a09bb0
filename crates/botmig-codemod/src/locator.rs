//! Bot module locator.
//!
//! Walks the entry script's `from MODULE import NAME` statements to the file
//! that defines the agent class. Resolution is a bounded traversal of the
//! module import graph: when an import lands on a package initializer, at
//! most [`MAX_REEXPORT_HOPS`] relative re-export (`from .SUB import NAME`) is
//! followed. One hop covers the usual aggregator `__init__.py`; longer
//! chains stop at the first aggregator.

use std::fs;
use std::path::{Path, PathBuf};

use botmig_config::CodemodConfig;
use botmig_core::ImportBinding;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::CodemodError;
use crate::parser::{FromImport, from_imports, parse_python};

/// Maximum number of re-export hops followed from a package initializer.
pub const MAX_REEXPORT_HOPS: usize = 1;

const PACKAGE_INIT: &str = "__init__.py";

/// How the agent file was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "via", rename_all = "snake_case")]
pub enum LocatedVia {
    Import { binding: ImportBinding },
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Located {
    pub path: PathBuf,
    #[serde(flatten)]
    pub via: LocatedVia,
}

pub struct BotLocator<'a> {
    root: &'a Path,
    config: &'a CodemodConfig,
}

impl<'a> BotLocator<'a> {
    #[must_use]
    pub const fn new(root: &'a Path, config: &'a CodemodConfig) -> Self {
        Self { root, config }
    }

    /// Locate the agent file from the entry script, falling back to the
    /// configured conventional locations. `Ok(None)` means nothing exists.
    pub fn locate(&self, entry_script: &Path) -> Result<Option<Located>, CodemodError> {
        if entry_script.is_file() {
            let source = fs::read_to_string(entry_script)
                .map_err(|e| CodemodError::io(entry_script, e))?;
            if let Some(binding) = self.resolve(&source) {
                if let Some(path) = binding.resolved.clone() {
                    info!(path = %path.display(), module = %binding.module, hops = binding.hops, "agent located via import");
                    return Ok(Some(Located {
                        path,
                        via: LocatedVia::Import { binding },
                    }));
                }
            }
        }

        let fallback = self
            .config
            .fallback_paths
            .iter()
            .map(|p| self.root.join(p))
            .find(|p| p.is_file());
        if let Some(path) = &fallback {
            info!(path = %path.display(), "agent located via fallback path");
        }
        Ok(fallback.map(|path| Located {
            path,
            via: LocatedVia::Fallback,
        }))
    }

    /// Resolve the entry script's imports; return the first binding that
    /// lands on an existing file.
    #[must_use]
    pub fn resolve(&self, entry_source: &str) -> Option<ImportBinding> {
        self.bindings(entry_source)
            .into_iter()
            .find(ImportBinding::is_resolved)
    }

    /// Every non-denylisted `from` import of the entry script, resolved
    /// against the file system, in source order.
    #[must_use]
    pub fn bindings(&self, entry_source: &str) -> Vec<ImportBinding> {
        let tree = parse_python(entry_source);
        from_imports(&tree.root())
            .iter()
            .filter(|import| import.level == 0 && !self.config.is_denylisted(&import.module))
            .flat_map(|import| {
                import
                    .names
                    .iter()
                    .map(|name| self.resolve_binding(&import.module, &name.name))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    fn resolve_binding(&self, module: &str, name: &str) -> ImportBinding {
        let mut binding = ImportBinding::new(module, name);
        binding.candidates = module_candidates(self.root, module);
        let Some(mut found) = binding.candidates.iter().find(|p| p.is_file()).cloned() else {
            debug!(module, name, "no candidate file exists");
            return binding;
        };

        while binding.hops < MAX_REEXPORT_HOPS
            && found.file_name().is_some_and(|n| n == PACKAGE_INIT)
        {
            let Some(target) = follow_reexport(&found, name) else {
                break;
            };
            debug!(from = %found.display(), to = %target.display(), name, "followed re-export");
            found = target;
            binding.hops += 1;
        }
        binding.resolved = Some(found);
        binding
    }
}

/// Candidate files for a dotted module: `a/b.py`, then `a/b/__init__.py`.
fn module_candidates(root: &Path, module: &str) -> Vec<PathBuf> {
    let dir = module.split('.').fold(root.to_path_buf(), |p, part| p.join(part));
    vec![dir.with_extension("py"), dir.join(PACKAGE_INIT)]
}

/// Follow a `from .SUB import NAME` re-export in a package initializer to the
/// sibling file. Only single-dot (sibling) imports are considered.
fn follow_reexport(init: &Path, name: &str) -> Option<PathBuf> {
    let source = fs::read_to_string(init).ok()?;
    let package_dir = init.parent()?;
    let tree = parse_python(&source);
    from_imports(&tree.root())
        .iter()
        .filter(|import| import.level == 1 && import.module.len() > 1)
        .find(|import| exports(import, name))
        .and_then(|import| {
            module_candidates(package_dir, &import.module[1..])
                .into_iter()
                .find(|p| p.is_file())
        })
}

fn exports(import: &FromImport, name: &str) -> bool {
    import.names.iter().any(|n| n.bound == name)
}
