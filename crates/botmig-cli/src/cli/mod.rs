use clap::Parser;

pub mod global;

pub use global::{GlobalFlags, OutputFormat};

/// Top-level CLI parser for the `botmig` binary.
#[derive(Debug, Parser)]
#[command(
    name = "botmig",
    version,
    about = "Upgrade a python-sc2 bot project to the ares-sc2 framework"
)]
pub struct Cli {
    /// Output format for the final report: text, json
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Quiet mode (no status lines, errors only)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long)]
    pub verbose: bool,

    /// Project root path (defaults to the current directory)
    #[arg(short, long)]
    pub project: Option<String>,

    /// Skip preflight, fetch, merge, install and cleanup; only patch the
    /// entry script, convert the bot source and write the version stamp
    #[arg(long)]
    pub skip_fetch: bool,
}

impl Cli {
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            project: self.project.clone(),
            skip_fetch: self.skip_fetch,
        }
    }
}
