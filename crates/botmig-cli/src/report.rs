//! Migration report: what each step did, for text or JSON output.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use botmig_codemod::{EntryPatch, LocatedVia};
use botmig_core::TransformOutcome;
use botmig_project::{Fetched, MovedEntry, ToolVersion, VersionStamp};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct MigrationReport {
    pub project: PathBuf,
    pub tools: Vec<ToolVersion>,
    pub fetched: Option<Fetched>,
    pub moved: Vec<MovedEntry>,
    /// Install command that ran, if any.
    pub installed: Option<String>,
    pub entry_patch: Option<EntryPatch>,
    pub agent_file: Option<PathBuf>,
    pub located_via: Option<LocatedVia>,
    pub transform: Option<TransformOutcome>,
    pub version_stamp: Option<VersionStamp>,
    pub cleaned_up: bool,
}

impl MigrationReport {
    #[must_use]
    pub fn new(project: &Path) -> Self {
        Self {
            project: project.to_path_buf(),
            ..Self::default()
        }
    }

    /// Multi-line human summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "project: {}", self.project.display());

        match &self.fetched {
            Some(fetched) => {
                let replaced = self.moved.iter().filter(|m| m.replaced).count();
                let _ = writeln!(out, "template: {}", fetched.url);
                let _ = writeln!(
                    out,
                    "merged: {} entries ({replaced} replaced)",
                    self.moved.len()
                );
                let _ = writeln!(
                    out,
                    "install: {}",
                    self.installed.as_deref().unwrap_or("skipped")
                );
            }
            None => {
                let _ = writeln!(out, "template: skipped");
            }
        }

        let entry = match &self.entry_patch {
            Some(EntryPatch::Patched { lines, .. }) => format!("patched ({lines} lines)"),
            Some(EntryPatch::AlreadyPatched { .. }) => "already patched".to_string(),
            Some(EntryPatch::MissingScript { .. }) => "not found".to_string(),
            None => "skipped".to_string(),
        };
        let _ = writeln!(out, "entry script: {entry}");

        match (&self.agent_file, &self.transform) {
            (Some(path), Some(outcome)) => {
                let _ = writeln!(out, "bot source: {}", self.relative(path).display());
                let _ = writeln!(out, "conversion: {}", describe_transform(outcome));
            }
            _ => {
                let _ = writeln!(out, "bot source: not found");
            }
        }

        let stamp = match &self.version_stamp {
            Some(VersionStamp::Written { commit, .. }) => format!("written ({commit})"),
            Some(VersionStamp::Disabled) | None => "disabled".to_string(),
            Some(VersionStamp::Failed { reason }) => format!("skipped ({reason})"),
        };
        let _ = writeln!(out, "version stamp: {stamp}");
        if self.fetched.is_some() {
            let _ = writeln!(
                out,
                "staging removed: {}",
                if self.cleaned_up { "yes" } else { "no" }
            );
        }
        out.trim_end().to_string()
    }

    fn relative<'p>(&self, path: &'p Path) -> &'p Path {
        path.strip_prefix(&self.project).unwrap_or(path)
    }
}

pub fn describe_transform(outcome: &TransformOutcome) -> String {
    if !outcome.changed {
        return "already migrated".to_string();
    }
    let mut parts = Vec::new();
    if outcome.bases_rewritten > 0 {
        parts.push(format!("base class of {} swapped", outcome.class_name));
    }
    if !outcome.injected.is_empty() {
        parts.push(format!("chained {}", outcome.injected_hooks().join(", ")));
    }
    if outcome.import_rewritten {
        parts.push("import updated".to_string());
    }
    if outcome.class_name_defaulted {
        parts.push(format!("class name defaulted to {}", outcome.class_name));
    }
    if !outcome.unmatched_classes.is_empty() {
        parts.push(format!(
            "check {} (not derived from the bot base)",
            outcome.unmatched_classes.join(", ")
        ));
    }
    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use botmig_core::HookInjection;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn skip_fetch_summary() {
        let mut report = MigrationReport::new(Path::new("/proj"));
        report.entry_patch = Some(EntryPatch::AlreadyPatched {
            script: PathBuf::from("/proj/run.py"),
        });
        report.version_stamp = Some(VersionStamp::Disabled);
        assert_eq!(
            report.summary(),
            "project: /proj\n\
             template: skipped\n\
             entry script: already patched\n\
             bot source: not found\n\
             version stamp: disabled"
        );
    }

    #[test]
    fn transform_description_lists_hooks() {
        let outcome = TransformOutcome {
            changed: true,
            bases_rewritten: 1,
            class_name: "CompetitiveBot".to_string(),
            import_rewritten: true,
            injected: vec![HookInjection {
                hook: "on_step".to_string(),
                line: 4,
                call: String::new(),
                made_async: false,
            }],
            ..TransformOutcome::default()
        };
        assert_eq!(
            describe_transform(&outcome),
            "base class of CompetitiveBot swapped; chained on_step; import updated"
        );
    }

    #[test]
    fn transform_description_flags_unmatched_classes() {
        let outcome = TransformOutcome {
            changed: true,
            class_name: "MyBot".to_string(),
            class_name_defaulted: true,
            injected: vec![HookInjection {
                hook: "on_start".to_string(),
                line: 2,
                call: String::new(),
                made_async: false,
            }],
            unmatched_classes: vec!["Helper".to_string()],
            ..TransformOutcome::default()
        };
        assert_eq!(
            describe_transform(&outcome),
            "chained on_start; class name defaulted to MyBot; check Helper (not derived from the bot base)"
        );
    }
}
