//! Tool preflight: confirm required commands exist before touching the project.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ProjectError;
use crate::runner::CommandRunner;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolVersion {
    pub tool: String,
    /// First line of `<tool> --version`.
    pub version: String,
}

/// Probe every tool with `<tool> --version`. A tool that cannot be started
/// or exits non-zero is missing; all missing tools are reported together.
pub fn check_tools(
    runner: &(impl CommandRunner + ?Sized),
    tools: &[String],
    cwd: &Path,
) -> Result<Vec<ToolVersion>, ProjectError> {
    let mut found = Vec::with_capacity(tools.len());
    let mut missing = Vec::new();
    for tool in tools {
        match runner.run(tool, &["--version"], cwd) {
            Ok(output) if output.success => {
                let version = output.stdout.lines().next().unwrap_or_default().trim();
                debug!(tool, version, "tool available");
                found.push(ToolVersion {
                    tool: tool.clone(),
                    version: version.to_string(),
                });
            }
            Ok(output) => {
                warn!(tool, code = ?output.code, "version probe failed");
                missing.push(tool.clone());
            }
            Err(e) => {
                warn!(tool, error = %e, "tool not found");
                missing.push(tool.clone());
            }
        }
    }

    if missing.is_empty() {
        Ok(found)
    } else {
        Err(ProjectError::MissingTool { tools: missing })
    }
}
