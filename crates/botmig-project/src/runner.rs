//! External command execution.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::ProjectError;

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    /// Exit code; `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    fn status(&self) -> String {
        self.code
            .map_or_else(|| "terminated by signal".to_string(), |c| format!("exit code {c}"))
    }
}

/// Runs external programs. Implemented by [`SystemRunner`] for real
/// processes and by fakes in tests.
pub trait CommandRunner {
    /// Run `program` with `args` in `cwd` and wait for it to finish.
    ///
    /// # Errors
    /// Only when the process cannot be started; a non-zero exit is reported
    /// through [`CommandOutput::success`].
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<CommandOutput, ProjectError>;

    /// Like [`run`](Self::run), but a non-zero exit is an error.
    fn run_checked(
        &self,
        program: &str,
        args: &[&str],
        cwd: &Path,
    ) -> Result<CommandOutput, ProjectError> {
        let output = self.run(program, args, cwd)?;
        if output.success {
            Ok(output)
        } else {
            Err(ProjectError::CommandFailed {
                program: program.to_string(),
                status: output.status(),
                stderr: output.stderr.trim().to_string(),
            })
        }
    }
}

/// Spawns real processes with `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<CommandOutput, ProjectError> {
        debug!(program, ?args, cwd = %cwd.display(), "running command");
        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .output()
            .map_err(|source| ProjectError::CommandSpawn {
                program: program.to_string(),
                source,
            })?;
        let output = CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(program, success = output.success, code = ?output.code, "command finished");
        Ok(output)
    }
}


#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::fake::FakeRunner;
    use super::*;

    #[test]
    fn run_checked_maps_failure() {
        let temp = TempDir::new().expect("tempdir should create");
        let runner = FakeRunner::default().failing("poetry");
        let err = runner
            .run_checked("poetry", &["install"], temp.path())
            .expect_err("should fail");
        match err {
            ProjectError::CommandFailed {
                program,
                status,
                stderr,
            } => {
                assert_eq!(program, "poetry");
                assert_eq!(status, "exit code 1");
                assert_eq!(stderr, "poetry: simulated failure");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn system_runner_reports_spawn_failure() {
        let temp = TempDir::new().expect("tempdir should create");
        let err = SystemRunner
            .run("botmig-definitely-not-a-real-program", &[], temp.path())
            .expect_err("should not spawn");
        assert!(matches!(err, ProjectError::CommandSpawn { .. }));
    }

    #[test]
    fn signal_status_is_described() {
        let output = CommandOutput::default();
        assert_eq!(output.status(), "terminated by signal");
    }
}
