//! Version stamp configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, check_relative};

const fn default_enabled() -> bool {
    true
}

fn default_file() -> PathBuf {
    PathBuf::from("version.txt")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StampConfig {
    /// Whether to write the version stamp at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Stamp file, relative to the project root.
    #[serde(default = "default_file")]
    pub file: PathBuf,
}

impl Default for StampConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            file: default_file(),
        }
    }
}

impl StampConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        check_relative("stamp.file", &self.file)
    }
}
