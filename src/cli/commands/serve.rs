use atlassian_mcp::{config, mcp};

pub fn run() -> anyhow::Result<()> {
    // Bad credentials abort here, before any protocol traffic.
    let credentials = config::resolve()?;
    tracing::info!(domain = %credentials.domain, "starting atlassian-mcp");
    mcp::serve_stdio(credentials)
}
