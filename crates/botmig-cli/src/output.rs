use crate::cli::OutputFormat;
use crate::report::MigrationReport;

/// Render the report in the requested format.
pub fn render(report: &MigrationReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(report.summary()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

/// Print the report in the requested format.
pub fn output(report: &MigrationReport, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(report, format)?;
    println!("{rendered}");
    Ok(())
}
