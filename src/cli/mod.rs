pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

const ENV_HELP: &str = "\
Environment variables:
  ATLASSIAN_DOMAIN              Your Atlassian domain (e.g., company.atlassian.net)
  ATLASSIAN_EMAIL               Your Atlassian account email
  ATLASSIAN_CONFLUENCE_TOKEN    Your Confluence API token (optional)
  ATLASSIAN_JIRA_TOKEN          Your Jira API token (optional)
  ATLASSIAN_API_TOKEN           Legacy: single token for both services";

#[derive(Parser)]
#[command(
    name = "atlassian-mcp",
    about = "Read-only MCP access to Confluence and Jira.",
    version,
    after_help = ENV_HELP
)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the MCP server over stdio (default)
    Serve,
    /// Check the configured credentials against Confluence and Jira
    Check(commands::check::CheckArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Dispatch a CLI command.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Check(args)) => commands::check::run(args),
        Some(Commands::Serve) | None => commands::serve::run(),
    }
}
