//! The migration pipeline.
//!
//! Strictly sequential: preflight, fetch, merge, install, entry patch,
//! locate, convert, stamp, cleanup. A failed preflight, clone or template
//! check aborts before anything in the project is touched; in the last case
//! the staging directory is kept for inspection. Once the template has been
//! validated, the staging directory is removed whatever happens afterwards.

use std::fmt::Display;
use std::path::Path;

use anyhow::Context;
use botmig_codemod::{BotLocator, EntryPatch, LocatedVia, patch_entry_point, transform_file};
use botmig_config::MigrationConfig;
use botmig_project::{
    CommandRunner, VersionStamp, check_tools, discard_staging, fetch_template,
    install_dependencies, reconcile, validate_entries, write_version_stamp,
};
use tracing::warn;

use crate::report::{MigrationReport, describe_transform};

pub struct Pipeline<'a, R: CommandRunner + ?Sized> {
    root: &'a Path,
    config: &'a MigrationConfig,
    runner: &'a R,
    skip_fetch: bool,
    show_status: bool,
}

impl<'a, R: CommandRunner + ?Sized> Pipeline<'a, R> {
    pub const fn new(root: &'a Path, config: &'a MigrationConfig, runner: &'a R) -> Self {
        Self {
            root,
            config,
            runner,
            skip_fetch: false,
            show_status: false,
        }
    }

    /// Only run the local steps against an already-merged project.
    #[must_use]
    pub const fn skip_fetch(mut self, skip: bool) -> Self {
        self.skip_fetch = skip;
        self
    }

    /// Print a status line per step to stdout.
    #[must_use]
    pub const fn show_status(mut self, show: bool) -> Self {
        self.show_status = show;
        self
    }

    pub fn run(&self) -> anyhow::Result<MigrationReport> {
        let mut report = MigrationReport::new(self.root);
        if self.skip_fetch {
            self.status("skipping preflight, fetch, merge and install");
            self.convert(&mut report)?;
            return Ok(report);
        }

        report.tools = check_tools(self.runner, &self.config.tools.required, self.root)
            .context("preflight failed")?;
        for tool in &report.tools {
            self.status(format!("found {}: {}", tool.tool, tool.version));
        }

        let fetched = fetch_template(self.runner, self.root, &self.config.template)
            .context("failed to fetch the template repository")?;
        self.status(format!(
            "cloned {} into {}",
            fetched.url,
            self.relative(&fetched.staging)
        ));
        let staging = fetched.staging.clone();
        report.fetched = Some(fetched);

        validate_entries(&staging, &self.config.template.required).with_context(|| {
            format!(
                "fetched template is incomplete; staging directory kept at {}",
                staging.display()
            )
        })?;

        let merged = self.merge(&staging, &mut report);
        let cleaned = discard_staging(&staging);
        if let (Err(_), Err(e)) = (&merged, &cleaned) {
            warn!(error = %e, "staging cleanup failed after an earlier error");
        }
        merged?;
        report.cleaned_up = cleaned.context("failed to remove the staging directory")?;
        if report.cleaned_up {
            self.status(format!("removed {}", self.relative(&staging)));
        }
        Ok(report)
    }

    fn merge(&self, staging: &Path, report: &mut MigrationReport) -> anyhow::Result<()> {
        report.moved = reconcile(staging, self.root, &self.config.template.required)
            .context("failed to merge template files into the project")?;
        for moved in &report.moved {
            let action = if moved.replaced { "replaced" } else { "added" };
            self.status(format!("{action} {} {}", moved.kind, moved.path.display()));
        }

        report.installed = install_dependencies(self.runner, self.root, &self.config.tools)
            .context("dependency install failed")?;
        if let Some(command) = &report.installed {
            self.status(format!("ran {command}"));
        }

        self.convert(report)
    }

    fn convert(&self, report: &mut MigrationReport) -> anyhow::Result<()> {
        let patch = patch_entry_point(self.root, &self.config.entry)
            .context("failed to patch the entry script")?;
        self.status(match &patch {
            EntryPatch::Patched { script, lines } => {
                format!("patched {} ({lines} bootstrap lines)", self.relative(script))
            }
            EntryPatch::AlreadyPatched { script } => {
                format!("{} already patched, skipping", self.relative(script))
            }
            EntryPatch::MissingScript { script } => {
                format!("{} not found, skipping patch", self.relative(script))
            }
        });
        report.entry_patch = Some(patch);

        let script = self.root.join(&self.config.entry.script);
        let located = BotLocator::new(self.root, &self.config.codemod)
            .locate(&script)
            .context("failed to locate the bot source")?;
        if let Some(located) = located {
            let via = match &located.via {
                LocatedVia::Import { binding } => {
                    format!("import of {} from {}", binding.name, binding.module)
                }
                LocatedVia::Fallback => "fallback location".to_string(),
            };
            self.status(format!("found bot source {} via {via}", self.relative(&located.path)));

            let outcome = transform_file(&located.path, &self.config.codemod)
                .context("failed to convert the bot source")?;
            self.status(format!(
                "{}: {}",
                self.relative(&located.path),
                describe_transform(&outcome)
            ));
            report.agent_file = Some(located.path);
            report.located_via = Some(located.via);
            report.transform = Some(outcome);
        } else {
            warn!("no bot source found from the entry script or fallback locations");
            self.status("no bot source found, skipping conversion");
        }

        let stamp = write_version_stamp(self.root, &self.config.stamp);
        match &stamp {
            VersionStamp::Written { file, commit, .. } => {
                self.status(format!("wrote {} ({commit})", self.relative(file)));
            }
            VersionStamp::Failed { reason } => {
                self.status(format!("version stamp skipped: {reason}"));
            }
            VersionStamp::Disabled => {}
        }
        report.version_stamp = Some(stamp);
        Ok(())
    }

    fn status(&self, line: impl Display) {
        if self.show_status {
            println!("{line}");
        }
    }

    fn relative<'p>(&self, path: &'p Path) -> std::path::Display<'p> {
        path.strip_prefix(self.root).unwrap_or(path).display()
    }
}
