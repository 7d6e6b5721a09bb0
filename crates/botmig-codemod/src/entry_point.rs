//! Entry-point patcher.
//!
//! Prepends the bootstrap lines that put the new framework's modules on the
//! interpreter's search path. The sentinel check makes the patch idempotent.

use std::fs;
use std::path::{Path, PathBuf};

use botmig_config::EntryConfig;
use serde::Serialize;
use tracing::{debug, info};

use crate::edits::newline;
use crate::error::CodemodError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EntryPatch {
    Patched { script: PathBuf, lines: usize },
    AlreadyPatched { script: PathBuf },
    MissingScript { script: PathBuf },
}

/// Patch the entry script configured in `config` under `project_root`.
///
/// A missing script is reported, not treated as an error.
pub fn patch_entry_point(
    project_root: &Path,
    config: &EntryConfig,
) -> Result<EntryPatch, CodemodError> {
    let script = project_root.join(&config.script);
    if !script.is_file() {
        info!(script = %script.display(), "entry script not found, skipping patch");
        return Ok(EntryPatch::MissingScript { script });
    }

    let source = fs::read_to_string(&script).map_err(|e| CodemodError::io(&script, e))?;
    match patch_source(&source, config) {
        Some(patched) => {
            fs::write(&script, patched).map_err(|e| CodemodError::io(&script, e))?;
            info!(script = %script.display(), "bootstrap lines inserted");
            Ok(EntryPatch::Patched {
                script,
                lines: config.bootstrap_lines.len(),
            })
        }
        None => {
            debug!(script = %script.display(), sentinel = %config.sentinel, "sentinel present");
            Ok(EntryPatch::AlreadyPatched { script })
        }
    }
}

/// Return the patched source, or `None` when a line already holds the sentinel.
#[must_use]
pub fn patch_source(source: &str, config: &EntryConfig) -> Option<String> {
    if source.lines().any(|line| line.contains(&config.sentinel)) {
        return None;
    }
    let nl = newline(source);
    let mut patched = String::with_capacity(source.len() + 128);
    for line in &config.bootstrap_lines {
        patched.push_str(line);
        patched.push_str(nl);
    }
    patched.push_str(source);
    Some(patched)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    const RUN_PY: &str = "from bot import CompetitiveBot\n\nimport argparse\n";

    #[test]
    fn inserts_bootstrap_at_top() {
        let patched = patch_source(RUN_PY, &EntryConfig::default()).expect("should patch");
        let lines: Vec<_> = patched.lines().collect();
        assert_eq!(lines[0], "import sys");
        assert_eq!(lines[1], r#"sys.path.append("ares-sc2/src/ares")"#);
        assert_eq!(lines[2], r#"sys.path.extend(["ares-sc2/src", "ares-sc2"])"#);
        assert!(patched.ends_with(RUN_PY));
    }

    #[test]
    fn sentinel_anywhere_skips() {
        let source = "import os\nsys.path.append('elsewhere')\n";
        assert_eq!(patch_source(source, &EntryConfig::default()), None);
    }

    #[test]
    fn crlf_files_stay_crlf() {
        let patched = patch_source("import os\r\n", &EntryConfig::default()).unwrap();
        assert!(patched.starts_with("import sys\r\n"));
    }

    #[test]
    fn rerun_leaves_file_byte_identical() {
        let temp = TempDir::new().expect("tempdir should create");
        let script = temp.path().join("run.py");
        fs::write(&script, RUN_PY).unwrap();
        let config = EntryConfig::default();

        let first = patch_entry_point(temp.path(), &config).unwrap();
        assert!(matches!(first, EntryPatch::Patched { lines: 3, .. }));
        let after_first = fs::read(&script).unwrap();

        let second = patch_entry_point(temp.path(), &config).unwrap();
        assert!(matches!(second, EntryPatch::AlreadyPatched { .. }));
        assert_eq!(fs::read(&script).unwrap(), after_first);
    }

    #[test]
    fn missing_script_is_skipped() {
        let temp = TempDir::new().expect("tempdir should create");
        let outcome = patch_entry_point(temp.path(), &EntryConfig::default()).unwrap();
        assert!(matches!(outcome, EntryPatch::MissingScript { .. }));
    }
}
