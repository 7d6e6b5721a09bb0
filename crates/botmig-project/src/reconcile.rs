//! File reconciliation: move required template entries into the project.

use std::fs;
use std::path::{Path, PathBuf};

use botmig_core::{EntryKind, RequiredEntry};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ProjectError;
use crate::remove::remove_all;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovedEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
    /// The project already had this entry; it was deleted first.
    pub replaced: bool,
}

/// Check every required entry exists in `staging` with the right kind.
pub fn validate_entries(staging: &Path, required: &[RequiredEntry]) -> Result<(), ProjectError> {
    for entry in required {
        let source = staging.join(&entry.path);
        if source.symlink_metadata().is_err() {
            return Err(ProjectError::MissingEntry {
                path: entry.path.clone(),
            });
        }
        if !entry.kind.matches(&source) {
            return Err(ProjectError::EntryKindMismatch {
                path: entry.path.clone(),
                expected: entry.kind,
            });
        }
    }
    debug!(count = required.len(), "template entries validated");
    Ok(())
}

/// Move each required entry from `staging` to the same relative path under
/// `project_root`, replacing what is there. Everything is validated before
/// the first move, so a bad template leaves the project untouched.
pub fn reconcile(
    staging: &Path,
    project_root: &Path,
    required: &[RequiredEntry],
) -> Result<Vec<MovedEntry>, ProjectError> {
    validate_entries(staging, required)?;

    let mut moved = Vec::with_capacity(required.len());
    for entry in required {
        let source = staging.join(&entry.path);
        let destination = project_root.join(&entry.path);

        let replaced = destination.symlink_metadata().is_ok();
        if replaced {
            remove_all(&destination)?;
        }
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| ProjectError::io(parent, e))?;
        }
        fs::rename(&source, &destination).map_err(|e| ProjectError::io(&source, e))?;

        info!(path = %entry.path.display(), kind = %entry.kind, replaced, "entry moved");
        moved.push(MovedEntry {
            path: entry.path.clone(),
            kind: entry.kind,
            replaced,
        });
    }
    Ok(moved)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::runner::fake::write_template;

    struct Fixture {
        _temp: TempDir,
        project: PathBuf,
        staging: PathBuf,
        required: Vec<RequiredEntry>,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().expect("tempdir should create");
        let project = temp.path().to_path_buf();
        let staging = project.join("staging");
        let required = vec![
            RequiredEntry::directory("ares-sc2"),
            RequiredEntry::directory("scripts"),
            RequiredEntry::file("config.yml"),
            RequiredEntry::file(".github/workflows/ladder_zip.yml"),
        ];
        write_template(&staging, &required);
        Fixture {
            _temp: temp,
            project,
            staging,
            required,
        }
    }

    #[test]
    fn moves_into_empty_project() {
        let f = fixture();
        let moved = reconcile(&f.staging, &f.project, &f.required).expect("should reconcile");
        assert_eq!(moved.len(), 4);
        assert!(moved.iter().all(|m| !m.replaced));
        assert!(f.project.join("ares-sc2/marker.txt").is_file());
        assert!(f.project.join(".github/workflows/ladder_zip.yml").is_file());
        assert!(!f.staging.join("ares-sc2").exists());
    }

    #[test]
    fn existing_entries_are_replaced() {
        let f = fixture();
        fs::create_dir_all(f.project.join("scripts")).unwrap();
        fs::write(f.project.join("scripts/old.sh"), "old").unwrap();
        fs::write(f.project.join("config.yml"), "old: true\n").unwrap();

        let moved = reconcile(&f.staging, &f.project, &f.required).expect("should reconcile");
        let replaced: Vec<_> = moved
            .iter()
            .filter(|m| m.replaced)
            .map(|m| m.path.clone())
            .collect();
        assert_eq!(replaced, vec![PathBuf::from("scripts"), PathBuf::from("config.yml")]);
        assert!(!f.project.join("scripts/old.sh").exists());
        assert_eq!(
            fs::read_to_string(f.project.join("config.yml")).unwrap(),
            "template config.yml\n"
        );
    }

    #[test]
    fn missing_entry_aborts_before_any_move() {
        let f = fixture();
        remove_all(&f.staging.join("scripts")).unwrap();

        let err = reconcile(&f.staging, &f.project, &f.required).expect_err("should abort");
        assert!(matches!(
            err,
            ProjectError::MissingEntry { ref path } if path == Path::new("scripts")
        ));
        assert!(err.to_string().contains("scripts"));
        assert!(!f.project.join("ares-sc2").exists());
        assert!(f.staging.join("ares-sc2").is_dir());
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let f = fixture();
        remove_all(&f.staging.join("config.yml")).unwrap();
        fs::create_dir(f.staging.join("config.yml")).unwrap();

        let err = validate_entries(&f.staging, &f.required).expect_err("should reject");
        assert!(matches!(
            err,
            ProjectError::EntryKindMismatch { expected: EntryKind::File, .. }
        ));
    }
}
