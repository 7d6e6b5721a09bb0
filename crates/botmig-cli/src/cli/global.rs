use clap::ValueEnum;

/// Final report format.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Debug)]
pub struct GlobalFlags {
    pub format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    pub project: Option<String>,
    pub skip_fetch: bool,
}

impl GlobalFlags {
    /// Status lines go to stdout only in text mode, so JSON output stays
    /// machine-readable.
    #[must_use]
    pub const fn show_status(&self) -> bool {
        !self.quiet && matches!(self.format, OutputFormat::Text)
    }
}
