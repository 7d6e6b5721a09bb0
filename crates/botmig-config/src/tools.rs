//! External tool configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_required() -> Vec<String> {
    vec!["git".to_string(), "poetry".to_string()]
}

fn default_install_command() -> Vec<String> {
    vec!["poetry".to_string(), "install".to_string()]
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolsConfig {
    /// Commands that must be on `PATH` before anything is touched.
    #[serde(default = "default_required")]
    pub required: Vec<String>,

    /// Dependency install command run in the project root after the merge.
    /// An empty list skips the install step.
    #[serde(default = "default_install_command")]
    pub install_command: Vec<String>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            required: default_required(),
            install_command: default_install_command(),
        }
    }
}

impl ToolsConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.required.iter().any(|tool| tool.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "tools.required".to_string(),
                reason: "tool names must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Split the install command into program and arguments.
    #[must_use]
    pub fn install_program(&self) -> Option<(&str, Vec<&str>)> {
        let (program, args) = self.install_command.split_first()?;
        Some((program.as_str(), args.iter().map(String::as_str).collect()))
    }
}
