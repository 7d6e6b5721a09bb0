use std::path::PathBuf;

use anyhow::Context;
use botmig_config::MigrationConfig;
use botmig_project::SystemRunner;
use clap::Parser;

mod cli;
mod output;
mod pipeline;
mod report;

fn main() {
    if let Err(error) = run() {
        eprintln!("botmig error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let flags = cli.global_flags();
    init_tracing(flags.quiet, flags.verbose)?;

    let project_root = resolve_project_root(flags.project.as_deref())?;
    let config = MigrationConfig::load(&project_root).context("failed to load configuration")?;

    let report = pipeline::Pipeline::new(&project_root, &config, &SystemRunner)
        .skip_fetch(flags.skip_fetch)
        .show_status(flags.show_status())
        .run()?;

    if !flags.quiet || flags.format == cli::OutputFormat::Json {
        output::output(&report, flags.format)?;
    }
    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("BOTMIG_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn resolve_project_root(project_override: Option<&str>) -> anyhow::Result<PathBuf> {
    let Some(path) = project_override else {
        return std::env::current_dir().context("failed to read current directory");
    };
    let explicit = PathBuf::from(path);
    if !explicit.is_dir() {
        anyhow::bail!(
            "invalid --project '{}': directory does not exist",
            explicit.display()
        );
    }
    Ok(explicit)
}
