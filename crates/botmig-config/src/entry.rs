//! Entry script configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, check_relative};

fn default_script() -> PathBuf {
    PathBuf::from("run.py")
}

fn default_sentinel() -> String {
    "sys.path.append".to_string()
}

fn default_bootstrap_lines() -> Vec<String> {
    vec![
        "import sys".to_string(),
        r#"sys.path.append("ares-sc2/src/ares")"#.to_string(),
        r#"sys.path.extend(["ares-sc2/src", "ares-sc2"])"#.to_string(),
    ]
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EntryConfig {
    /// Entry script, relative to the project root.
    #[serde(default = "default_script")]
    pub script: PathBuf,

    /// Substring marking the module search paths as already configured.
    #[serde(default = "default_sentinel")]
    pub sentinel: String,

    /// Lines prepended to the entry script, without line terminators.
    #[serde(default = "default_bootstrap_lines")]
    pub bootstrap_lines: Vec<String>,
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            script: default_script(),
            sentinel: default_sentinel(),
            bootstrap_lines: default_bootstrap_lines(),
        }
    }
}

impl EntryConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        check_relative("entry.script", &self.script)?;
        if self.sentinel.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "entry.sentinel".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        // Without this the patch would not be idempotent.
        if !self
            .bootstrap_lines
            .iter()
            .any(|line| line.contains(&self.sentinel))
        {
            return Err(ConfigError::InvalidValue {
                field: "entry.bootstrap_lines".to_string(),
                reason: format!("no line contains the sentinel '{}'", self.sentinel),
            });
        }
        Ok(())
    }
}
