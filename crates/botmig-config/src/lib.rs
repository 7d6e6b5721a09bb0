//! # botmig-config
//!
//! Layered configuration loading for botmig using figment.
//!
//! Every fixed table the migration relies on (required template entries,
//! lifecycle hooks, import denylist, bootstrap lines...) lives here as
//! immutable data. The built-in defaults describe the `BotAI` -> `AresBot`
//! migration, so the tool runs without any configuration file.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`BOTMIG_*` prefix, `__` as separator)
//! 2. Project-level `botmig.toml`
//! 3. User-level `~/.config/botmig/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `BOTMIG_TEMPLATE__URL` -> `template.url`,
//! `BOTMIG_STAMP__ENABLED` -> `stamp.enabled`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use botmig_config::MigrationConfig;
//!
//! let config = MigrationConfig::load(std::path::Path::new(".")).expect("config");
//! println!("template: {}", config.template.url);
//! ```

mod codemod;
mod entry;
mod error;
mod stamp;
mod template;
mod tools;

pub use codemod::CodemodConfig;
pub use entry::EntryConfig;
pub use error::ConfigError;
pub use stamp::StampConfig;
pub use template::TemplateConfig;
pub use tools::ToolsConfig;

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// Name of the project-local configuration file.
pub const PROJECT_CONFIG_FILE: &str = "botmig.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MigrationConfig {
    #[serde(default)]
    pub template: TemplateConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub entry: EntryConfig,
    #[serde(default)]
    pub codemod: CodemodConfig,
    #[serde(default)]
    pub stamp: StampConfig,
}

impl MigrationConfig {
    /// Load configuration for the project rooted at `project_root`.
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables (`BOTMIG_*` prefix)
    /// 2. `<project_root>/botmig.toml`
    /// 3. `~/.config/botmig/config.toml`
    /// 4. Default values
    pub fn load(project_root: &Path) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(project_root).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer extra providers.
    pub fn figment(project_root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = project_root.join(PROJECT_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("BOTMIG_").split("__"))
    }

    /// Reject values that would make the pipeline act outside the project.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.template.validate()?;
        self.tools.validate()?;
        self.entry.validate()?;
        self.codemod.validate()?;
        self.stamp.validate()
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("botmig").join("config.toml"))
    }
}

/// Paths in the configuration are joined onto the project root, so they
/// must stay relative and may not climb out of it.
pub(crate) fn check_relative(field: &str, path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    if path.is_absolute()
        || path
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir))
    {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("'{}' must be relative to the project root", path.display()),
        });
    }
    Ok(())
}
