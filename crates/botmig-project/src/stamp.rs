//! Version stamp: record the project's HEAD commit next to the migrated bot.

use std::fs;
use std::path::{Path, PathBuf};

use botmig_config::StampConfig;
use chrono::DateTime;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::ProjectError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VersionStamp {
    Written {
        file: PathBuf,
        commit: String,
        date: String,
    },
    Disabled,
    /// Best-effort: the reason is logged and reported, the run continues.
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct HeadInfo {
    commit: String,
    date: String,
}

/// Write the stamp file. Never fails the migration.
pub fn write_version_stamp(project_root: &Path, config: &StampConfig) -> VersionStamp {
    if !config.enabled {
        return VersionStamp::Disabled;
    }
    let file = project_root.join(&config.file);
    match stamp(project_root, &file) {
        Ok(head) => {
            info!(file = %file.display(), commit = %head.commit, "version stamp written");
            VersionStamp::Written {
                file,
                commit: head.commit,
                date: head.date,
            }
        }
        Err(e) => {
            warn!(error = %e, "version stamp skipped");
            VersionStamp::Failed {
                reason: e.to_string(),
            }
        }
    }
}

fn stamp(project_root: &Path, file: &Path) -> Result<HeadInfo, ProjectError> {
    let head = read_head(project_root)?;
    fs::write(file, render(&head)).map_err(|e| ProjectError::io(file, e))?;
    Ok(head)
}

fn read_head(project_root: &Path) -> Result<HeadInfo, ProjectError> {
    let repo = gix::discover(project_root)
        .map_err(|e| ProjectError::Git(format!("discover repository: {e}")))?;
    let commit = repo
        .head_commit()
        .map_err(|e| ProjectError::Git(format!("read HEAD commit: {e}")))?;
    let time = commit
        .time()
        .map_err(|e| ProjectError::Git(format!("read commit time: {e}")))?;
    let date = DateTime::from_timestamp(time.seconds, 0)
        .ok_or_else(|| ProjectError::Git(format!("commit time out of range: {}", time.seconds)))?
        .to_rfc3339();
    Ok(HeadInfo {
        commit: commit.id.to_string(),
        date,
    })
}

fn render(head: &HeadInfo) -> String {
    format!("commit: {}\ndate: {}\n", head.commit, head.date)
}

#[cfg(test)]
mod tests {
    use std::process::Command;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn git(dir: &Path, args: &[&str]) -> bool {
        Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .is_ok_and(|o| o.status.success())
    }

    #[test]
    fn disabled_writes_nothing() {
        let temp = TempDir::new().expect("tempdir should create");
        let config = StampConfig {
            enabled: false,
            ..StampConfig::default()
        };
        assert_eq!(write_version_stamp(temp.path(), &config), VersionStamp::Disabled);
        assert!(!temp.path().join("version.txt").exists());
    }

    #[test]
    fn renders_commit_and_date() {
        let head = HeadInfo {
            commit: "abc123".to_string(),
            date: "2024-01-02T03:04:05+00:00".to_string(),
        };
        assert_eq!(render(&head), "commit: abc123\ndate: 2024-01-02T03:04:05+00:00\n");
    }

    #[test]
    fn stamps_head_of_real_repository() {
        let temp = TempDir::new().expect("tempdir should create");
        let dir = temp.path();
        // Needs a git binary to build the fixture repository.
        if !git(dir, &["init", "-q"]) {
            return;
        }
        assert!(git(dir, &["config", "user.email", "bot@example.com"]));
        assert!(git(dir, &["config", "user.name", "Bot"]));
        assert!(git(dir, &["commit", "-q", "--allow-empty", "-m", "init"]));

        let stamp = write_version_stamp(dir, &StampConfig::default());
        let VersionStamp::Written { file, commit, date } = stamp else {
            panic!("expected a written stamp, got {stamp:?}");
        };
        assert_eq!(commit.len(), 40);
        assert!(DateTime::parse_from_rfc3339(&date).is_ok());
        let content = fs::read_to_string(file).expect("stamp should read");
        assert!(content.starts_with(&format!("commit: {commit}\n")));
    }
}
