//! Template repository configuration.

use std::path::PathBuf;

use botmig_core::RequiredEntry;
use serde::{Deserialize, Serialize};

use crate::{ConfigError, check_relative};

fn default_url() -> String {
    "https://github.com/AresSC2/ares-sc2-bot-template".to_string()
}

fn default_staging_dir() -> PathBuf {
    PathBuf::from("ares-sc2-bot-template")
}

fn default_required() -> Vec<RequiredEntry> {
    vec![
        RequiredEntry::directory("ares-sc2"),
        RequiredEntry::directory("scripts"),
        RequiredEntry::file("config.yml"),
        RequiredEntry::file("poetry.lock"),
        RequiredEntry::file("pyproject.toml"),
        RequiredEntry::file(".github/workflows/ladder_zip.yml"),
    ]
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TemplateConfig {
    /// Repository cloned (recursively, with submodules) into the staging directory.
    #[serde(default = "default_url")]
    pub url: String,

    /// Staging directory, relative to the project root.
    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,

    /// Entries moved from the staging directory into the project, in order.
    #[serde(default = "default_required")]
    pub required: Vec<RequiredEntry>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            staging_dir: default_staging_dir(),
            required: default_required(),
        }
    }
}

impl TemplateConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "template.url".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        check_relative("template.staging_dir", &self.staging_dir)?;
        for entry in &self.required {
            check_relative("template.required", &entry.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use botmig_core::EntryKind;

    use super::*;

    #[test]
    fn defaults_list_scripts_as_directory() {
        let config = TemplateConfig::default();
        let scripts = config
            .required
            .iter()
            .find(|e| e.path == PathBuf::from("scripts"))
            .expect("scripts should be required");
        assert_eq!(scripts.kind, EntryKind::Directory);
    }

    #[test]
    fn empty_url_is_rejected() {
        let config = TemplateConfig {
            url: "  ".to_string(),
            ..TemplateConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
