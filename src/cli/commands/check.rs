use atlassian_mcp::config;
use atlassian_mcp::core::client::AtlassianClient;
use atlassian_mcp::core::probe::{self, ProbeStatus};

use crate::cli::OutputFormat;

#[derive(clap::Args)]
pub struct CheckArgs {
    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub format: OutputFormat,
}

pub fn run(args: CheckArgs) -> anyhow::Result<()> {
    let credentials = config::resolve()?;
    let rt = tokio::runtime::Runtime::new()?;

    let reports = rt.block_on(async {
        let mut client = AtlassianClient::new(&credentials)?;
        let reports = probe::probe_all(&client).await;
        client.close();
        anyhow::Ok(reports)
    })?;

    crate::cli::output::output_reports(
        &credentials.base_url(),
        &reports,
        args.format,
        &mut std::io::stdout(),
    )?;

    if reports.iter().any(|r| r.status == ProbeStatus::Failed) {
        anyhow::bail!("connection check failed");
    }
    Ok(())
}
