use std::fmt;

use serde::{Deserialize, Serialize};

use super::{CONFLUENCE_TOKEN_VAR, JIRA_TOKEN_VAR};

/// The two upstream products. Each one is reached through its own channel
/// with its own token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Confluence,
    Jira,
}

impl Service {
    pub const ALL: [Service; 2] = [Service::Confluence, Service::Jira];

    /// Environment variable holding this service's token.
    pub fn token_var(&self) -> &'static str {
        match self {
            Self::Confluence => CONFLUENCE_TOKEN_VAR,
            Self::Jira => JIRA_TOKEN_VAR,
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confluence => f.write_str("Confluence"),
            Self::Jira => f.write_str("Jira"),
        }
    }
}

/// Validated credential set. Built once at startup and never mutated.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub domain: String,
    pub email: String,
    pub confluence_token: Option<String>,
    pub jira_token: Option<String>,
}

impl Credentials {
    pub fn token(&self, service: Service) -> Option<&str> {
        match service {
            Service::Confluence => self.confluence_token.as_deref(),
            Service::Jira => self.jira_token.as_deref(),
        }
    }

    /// Base URL for both REST APIs. A bare host gets `https://`; a domain that
    /// already names its scheme is used as given.
    pub fn base_url(&self) -> String {
        let domain = self.domain.trim_end_matches('/');
        if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.to_string()
        } else {
            format!("https://{domain}")
        }
    }
}

// Tokens stay out of debug output and therefore out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |token: &Option<String>| token.as_ref().map(|_| "<redacted>");
        f.debug_struct("Credentials")
            .field("domain", &self.domain)
            .field("email", &self.email)
            .field("confluence_token", &redact(&self.confluence_token))
            .field("jira_token", &redact(&self.jira_token))
            .finish()
    }
}
