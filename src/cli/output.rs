use std::io::Write;

use owo_colors::OwoColorize;

use atlassian_mcp::core::probe::{ProbeReport, ProbeStatus};
use crate::cli::OutputFormat;

/// Write connection check results in the requested output format.
pub fn output_reports(
    base_url: &str,
    reports: &[ProbeReport],
    format: OutputFormat,
    writer: &mut dyn Write,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, reports)?;
            writeln!(writer)?;
        }
        OutputFormat::Human => {
            writeln!(writer, "  {} {}", "check:".bold(), base_url)?;
            for report in reports {
                let marker = match report.status {
                    ProbeStatus::Ok => "ok".green().bold().to_string(),
                    ProbeStatus::Skipped => "skipped".dimmed().to_string(),
                    ProbeStatus::Failed => "failed".red().bold().to_string(),
                };
                writeln!(
                    writer,
                    "  {:<11} {} {}",
                    report.service.to_string(),
                    marker,
                    report.detail
                )?;
            }
        }
    }
    Ok(())
}
