//! Source transformer and bot module locator configuration.

use std::path::PathBuf;

use botmig_core::LifecycleHook;
use serde::{Deserialize, Serialize};

use crate::{ConfigError, check_relative};

fn default_old_modules() -> Vec<String> {
    vec!["sc2.bot_ai".to_string(), "sc2".to_string()]
}

fn default_old_base() -> String {
    "BotAI".to_string()
}

fn default_new_module() -> String {
    "ares".to_string()
}

fn default_new_base() -> String {
    "AresBot".to_string()
}

fn default_class_name() -> String {
    "MyBot".to_string()
}

fn default_denylist() -> Vec<String> {
    [
        "sc2",
        "ares",
        "sys",
        "os",
        "asyncio",
        "argparse",
        "logging",
        "aiohttp",
        "typing",
        "random",
        "pathlib",
        "config",
        "__future__",
    ]
    .into_iter()
    .map(ToString::to_string)
    .collect()
}

fn default_fallback_paths() -> Vec<PathBuf> {
    vec![
        PathBuf::from("bot/main.py"),
        PathBuf::from("bot/bot.py"),
        PathBuf::from("bot/__init__.py"),
    ]
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CodemodConfig {
    /// Modules the old base class may be imported from.
    #[serde(default = "default_old_modules")]
    pub old_modules: Vec<String>,

    #[serde(default = "default_old_base")]
    pub old_base: String,

    #[serde(default = "default_new_module")]
    pub new_module: String,

    #[serde(default = "default_new_base")]
    pub new_base: String,

    /// Class name used for base calls when no class derives from either base.
    #[serde(default = "default_class_name")]
    pub default_class_name: String,

    /// Modules that can never name the agent's own module. A module matches
    /// when it equals an entry or is a submodule of it.
    #[serde(default = "default_denylist")]
    pub import_denylist: Vec<String>,

    /// Conventional agent locations tried when no import resolves.
    #[serde(default = "default_fallback_paths")]
    pub fallback_paths: Vec<PathBuf>,

    #[serde(default = "LifecycleHook::ares_defaults")]
    pub hooks: Vec<LifecycleHook>,
}

impl Default for CodemodConfig {
    fn default() -> Self {
        Self {
            old_modules: default_old_modules(),
            old_base: default_old_base(),
            new_module: default_new_module(),
            new_base: default_new_base(),
            default_class_name: default_class_name(),
            import_denylist: default_denylist(),
            fallback_paths: default_fallback_paths(),
            hooks: LifecycleHook::ares_defaults(),
        }
    }
}

impl CodemodConfig {
    /// The import statement the old one is rewritten to.
    #[must_use]
    pub fn new_import(&self) -> String {
        format!("from {} import {}", self.new_module, self.new_base)
    }

    /// Whether `module` is denylisted (exact match or submodule).
    #[must_use]
    pub fn is_denylisted(&self, module: &str) -> bool {
        self.import_denylist.iter().any(|denied| {
            module == denied
                || module
                    .strip_prefix(denied.as_str())
                    .is_some_and(|rest| rest.starts_with('.'))
        })
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("codemod.old_base", &self.old_base),
            ("codemod.new_module", &self.new_module),
            ("codemod.new_base", &self.new_base),
            ("codemod.default_class_name", &self.default_class_name),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        }
        for path in &self.fallback_paths {
            check_relative("codemod.fallback_paths", path)?;
        }
        // Already-chained hooks are recognized by `super(...).<hook>(...)`,
        // so the rendered call must have that shape.
        for hook in &self.hooks {
            let template = &hook.call_template;
            if !template.contains("super(") || !template.contains(").{hook}(") {
                return Err(ConfigError::InvalidValue {
                    field: "codemod.hooks".to_string(),
                    reason: format!(
                        "call template '{template}' for {} must call super(...).{{hook}}(...)",
                        hook.name
                    ),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denylist_matches_submodules_only_on_dot_boundary() {
        let config = CodemodConfig::default();
        assert!(config.is_denylisted("sc2"));
        assert!(config.is_denylisted("sc2.bot_ai"));
        assert!(!config.is_denylisted("sc2bot"));
        assert!(!config.is_denylisted("bot"));
    }

    #[test]
    fn new_import_statement() {
        assert_eq!(CodemodConfig::default().new_import(), "from ares import AresBot");
    }

    #[test]
    fn call_template_must_chain_through_super() {
        let mut config = CodemodConfig::default();
        config.validate().expect("defaults should validate");

        config.hooks[0].call_template = "await super().{hook}({args})".to_string();
        config.validate().expect("zero-argument super should validate");

        config.hooks[0].call_template = "await self.{hook}({args})".to_string();
        let err = config.validate().expect_err("should reject");
        assert!(err.to_string().contains("codemod.hooks"), "{err}");
    }
}
