//! Integration tests for TOML and environment configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var manipulation.

use std::path::{Path, PathBuf};

use botmig_config::MigrationConfig;
use botmig_core::EntryKind;
use figment::Jail;

#[test]
fn project_toml_overrides_template_section() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "botmig.toml",
            r#"
[template]
url = "https://example.com/fork/ares-sc2-bot-template"
staging_dir = "staging"

[[template.required]]
path = "scripts"
kind = "directory"

[[template.required]]
path = "pyproject.toml"
kind = "file"
"#,
        )?;

        let config = MigrationConfig::load(Path::new(".")).expect("config loads");
        assert_eq!(
            config.template.url,
            "https://example.com/fork/ares-sc2-bot-template"
        );
        assert_eq!(config.template.staging_dir, PathBuf::from("staging"));
        assert_eq!(config.template.required.len(), 2);
        assert_eq!(config.template.required[0].kind, EntryKind::Directory);
        // Untouched sections keep their defaults.
        assert_eq!(config.entry.script, PathBuf::from("run.py"));
        Ok(())
    });
}

#[test]
fn hooks_can_be_replaced_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "botmig.toml",
            r#"
[[codemod.hooks]]
name = "on_step"
params = ["iteration"]
call_template = "await super().{hook}({args})"
"#,
        )?;

        let config = MigrationConfig::load(Path::new(".")).expect("config loads");
        assert_eq!(config.codemod.hooks.len(), 1);
        assert_eq!(
            config.codemod.hooks[0].render_call("Ignored", &["iteration".to_string()]),
            "await super().on_step(iteration)"
        );
        Ok(())
    });
}

#[test]
fn env_beats_project_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "botmig.toml",
            r#"
[stamp]
enabled = true
file = "from-toml.txt"
"#,
        )?;
        jail.set_env("BOTMIG_STAMP__FILE", "from-env.txt");
        jail.set_env("BOTMIG_STAMP__ENABLED", "false");

        let config = MigrationConfig::load(Path::new(".")).expect("config loads");
        assert_eq!(config.stamp.file, PathBuf::from("from-env.txt"));
        assert!(!config.stamp.enabled);
        Ok(())
    });
}

#[test]
fn absolute_staging_dir_fails_validation() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "botmig.toml",
            r#"
[template]
staging_dir = "/tmp/staging"
"#,
        )?;

        let err = MigrationConfig::load(Path::new(".")).expect_err("should reject");
        assert!(err.to_string().contains("template.staging_dir"), "{err}");
        Ok(())
    });
}

#[test]
fn stamp_file_outside_project_fails_validation() {
    Jail::expect_with(|jail| {
        jail.set_env("BOTMIG_STAMP__FILE", "../version.txt");

        let err = MigrationConfig::load(Path::new(".")).expect_err("should reject");
        assert!(err.to_string().contains("stamp.file"), "{err}");
        Ok(())
    });
}

#[test]
fn call_template_without_super_fails_validation() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "botmig.toml",
            r#"
[[codemod.hooks]]
name = "on_step"
params = ["iteration"]
call_template = "await self.base_{hook}({args})"
"#,
        )?;

        let err = MigrationConfig::load(Path::new(".")).expect_err("should reject");
        assert!(err.to_string().contains("codemod.hooks"), "{err}");
        Ok(())
    });
}
