//! Template fetch and staging-directory lifecycle.

use std::path::{Path, PathBuf};

use botmig_config::TemplateConfig;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::ProjectError;
use crate::remove::remove_all;
use crate::runner::CommandRunner;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fetched {
    pub url: String,
    pub staging: PathBuf,
    /// A staging directory left by an interrupted run was removed first.
    pub removed_stale: bool,
}

/// Clone the template (with submodules) into the staging directory under
/// `project_root`.
pub fn fetch_template(
    runner: &(impl CommandRunner + ?Sized),
    project_root: &Path,
    template: &TemplateConfig,
) -> Result<Fetched, ProjectError> {
    let staging = project_root.join(&template.staging_dir);
    let removed_stale = discard_staging(&staging)?;
    if removed_stale {
        warn!(staging = %staging.display(), "removed stale staging directory from an earlier run");
    }

    let target = template.staging_dir.to_string_lossy();
    info!(url = %template.url, staging = %staging.display(), "cloning template");
    runner.run_checked(
        "git",
        &["clone", "--recursive", &template.url, &target],
        project_root,
    )?;

    if !staging.is_dir() {
        return Err(ProjectError::MissingEntry { path: staging });
    }
    Ok(Fetched {
        url: template.url.clone(),
        staging,
        removed_stale,
    })
}

/// Delete the staging directory if present. Returns whether anything was
/// removed.
pub fn discard_staging(staging: &Path) -> Result<bool, ProjectError> {
    if staging.symlink_metadata().is_err() {
        return Ok(false);
    }
    remove_all(staging)?;
    info!(staging = %staging.display(), "staging directory removed");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::runner::fake::FakeRunner;

    #[test]
    fn clones_into_staging() {
        let temp = TempDir::new().expect("tempdir should create");
        let template = TemplateConfig::default();
        let runner = FakeRunner::with_template(&template.required);

        let fetched = fetch_template(&runner, temp.path(), &template).expect("fetch should work");
        assert_eq!(fetched.staging, temp.path().join("ares-sc2-bot-template"));
        assert!(!fetched.removed_stale);
        assert!(fetched.staging.join("ares-sc2").is_dir());
        assert_eq!(
            runner.calls(),
            vec![
                "git clone --recursive https://github.com/AresSC2/ares-sc2-bot-template ares-sc2-bot-template"
            ]
        );
    }

    #[test]
    fn stale_staging_is_replaced() {
        let temp = TempDir::new().expect("tempdir should create");
        let template = TemplateConfig::default();
        let stale = temp.path().join(&template.staging_dir);
        fs::create_dir_all(stale.join("leftover")).unwrap();
        let runner = FakeRunner::with_template(&template.required);

        let fetched = fetch_template(&runner, temp.path(), &template).expect("fetch should work");
        assert!(fetched.removed_stale);
        assert!(!stale.join("leftover").exists());
    }

    #[test]
    fn clone_failure_is_fatal() {
        let temp = TempDir::new().expect("tempdir should create");
        let runner = FakeRunner::default().failing("git");
        let err = fetch_template(&runner, temp.path(), &TemplateConfig::default())
            .expect_err("clone should fail");
        assert!(matches!(err, ProjectError::CommandFailed { ref program, .. } if program == "git"));
    }

    #[test]
    fn discard_reports_whether_removed() {
        let temp = TempDir::new().expect("tempdir should create");
        let staging = temp.path().join("staging");
        assert!(!discard_staging(&staging).unwrap());
        fs::create_dir(&staging).unwrap();
        assert!(discard_staging(&staging).unwrap());
        assert!(!staging.exists());
    }
}
