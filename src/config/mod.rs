pub mod types;

use url::Url;

use crate::error::{AtlassianError, Result};
use types::Credentials;

pub const DOMAIN_VAR: &str = "ATLASSIAN_DOMAIN";
pub const EMAIL_VAR: &str = "ATLASSIAN_EMAIL";
pub const CONFLUENCE_TOKEN_VAR: &str = "ATLASSIAN_CONFLUENCE_TOKEN";
pub const JIRA_TOKEN_VAR: &str = "ATLASSIAN_JIRA_TOKEN";
/// Legacy single token applied to both services.
pub const LEGACY_TOKEN_VAR: &str = "ATLASSIAN_API_TOKEN";

/// Resolve credentials from the process environment.
pub fn resolve() -> Result<Credentials> {
    resolve_with(|key| std::env::var(key).ok())
}

/// Resolve credentials through an arbitrary variable lookup.
///
/// Per-service tokens always win. The legacy token fills in both services,
/// and only when neither per-service token is set.
pub fn resolve_with<F>(lookup: F) -> Result<Credentials>
where
    F: Fn(&str) -> Option<String>,
{
    let read = |key: &str| {
        lookup(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    let (Some(domain), Some(email)) = (read(DOMAIN_VAR), read(EMAIL_VAR)) else {
        return Err(AtlassianError::Configuration(format!(
            "missing required environment variables: {DOMAIN_VAR}, {EMAIL_VAR}"
        )));
    };

    let mut confluence_token = read(CONFLUENCE_TOKEN_VAR);
    let mut jira_token = read(JIRA_TOKEN_VAR);
    let legacy_token = read(LEGACY_TOKEN_VAR);

    if let Some(legacy) = legacy_token {
        if confluence_token.is_none() && jira_token.is_none() {
            tracing::debug!("using {LEGACY_TOKEN_VAR} for both Confluence and Jira");
            confluence_token = Some(legacy.clone());
            jira_token = Some(legacy);
        } else {
            tracing::warn!(
                "{LEGACY_TOKEN_VAR} is ignored because a per-service token is set"
            );
        }
    }

    if confluence_token.is_none() && jira_token.is_none() {
        return Err(AtlassianError::Configuration(format!(
            "no API token configured: set {CONFLUENCE_TOKEN_VAR} and/or {JIRA_TOKEN_VAR} \
             (or legacy {LEGACY_TOKEN_VAR})"
        )));
    }

    let credentials = Credentials {
        domain,
        email,
        confluence_token,
        jira_token,
    };
    check_base_url(&credentials.base_url())?;
    Ok(credentials)
}

/// A domain that cannot form a usable base URL is a startup failure, not
/// something the first tool call discovers.
fn check_base_url(base_url: &str) -> Result<()> {
    let parsed = Url::parse(base_url).map_err(|e| {
        AtlassianError::Configuration(format!("invalid {DOMAIN_VAR} '{base_url}': {e}"))
    })?;
    if parsed.cannot_be_a_base() {
        return Err(AtlassianError::Configuration(format!(
            "invalid {DOMAIN_VAR} '{base_url}': not a base URL"
        )));
    }
    Ok(())
}
