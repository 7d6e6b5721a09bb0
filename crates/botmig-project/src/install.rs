//! Dependency install in the merged project.

use std::path::Path;

use botmig_config::ToolsConfig;
use tracing::info;

use crate::error::ProjectError;
use crate::runner::CommandRunner;

/// Run the configured install command in `project_root`.
///
/// Returns the command line that ran, or `None` when no install command is
/// configured. A non-zero exit is fatal.
pub fn install_dependencies(
    runner: &(impl CommandRunner + ?Sized),
    project_root: &Path,
    tools: &ToolsConfig,
) -> Result<Option<String>, ProjectError> {
    let Some((program, args)) = tools.install_program() else {
        info!("no install command configured, skipping");
        return Ok(None);
    };
    let command = tools.install_command.join(" ");
    info!(%command, "installing dependencies");
    runner.run_checked(program, &args, project_root)?;
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::runner::fake::FakeRunner;

    #[test]
    fn runs_poetry_install() {
        let temp = TempDir::new().expect("tempdir should create");
        let runner = FakeRunner::default();
        let ran = install_dependencies(&runner, temp.path(), &ToolsConfig::default())
            .expect("install should work");
        assert_eq!(ran.as_deref(), Some("poetry install"));
        assert_eq!(runner.calls(), vec!["poetry install"]);
    }

    #[test]
    fn failure_is_fatal() {
        let temp = TempDir::new().expect("tempdir should create");
        let runner = FakeRunner::default().failing("poetry");
        let err = install_dependencies(&runner, temp.path(), &ToolsConfig::default())
            .expect_err("install should fail");
        assert!(matches!(err, ProjectError::CommandFailed { .. }));
    }

    #[test]
    fn empty_command_skips() {
        let temp = TempDir::new().expect("tempdir should create");
        let runner = FakeRunner::default();
        let tools = ToolsConfig {
            install_command: Vec::new(),
            ..ToolsConfig::default()
        };
        assert_eq!(install_dependencies(&runner, temp.path(), &tools).unwrap(), None);
        assert!(runner.calls().is_empty());
    }
}
