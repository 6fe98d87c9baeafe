// MCP resource definitions.
//
// Two URI templates, one per service. A URI names a single page or issue;
// reading it fetches the entity and returns its JSON.

use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::core::client::AtlassianClient;
use crate::error::{AtlassianError, Result};

pub const CONFLUENCE_SCHEME: &str = "confluence";
pub const JIRA_SCHEME: &str = "jira";
pub const JSON_MIME_TYPE: &str = "application/json";

/// Static description of one addressable resource kind.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTemplateSpec {
    pub uri_template: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub mime_type: &'static str,
}

pub const RESOURCE_TEMPLATES: [ResourceTemplateSpec; 2] = [
    ResourceTemplateSpec {
        uri_template: "confluence://page/{page_id}",
        name: "Confluence Page",
        description: "A Confluence page by ID, with body, space, version and ancestors",
        mime_type: JSON_MIME_TYPE,
    },
    ResourceTemplateSpec {
        uri_template: "jira://issue/{issue_key}",
        name: "Jira Issue",
        description: "A Jira issue by key, with changelog, attachments and comments",
        mime_type: JSON_MIME_TYPE,
    },
];

/// A parsed resource URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRef {
    Page(String),
    Issue(String),
}

impl ResourceRef {
    /// Parse `confluence://page/<id>` or `jira://issue/<key>`.
    ///
    /// The path form (`confluence:///page/<id>`) is accepted too. The
    /// identifier is the last path segment.
    pub fn parse(uri: &str) -> Result<Self> {
        let invalid = |reason: String| AtlassianError::InvalidResource {
            uri: uri.to_string(),
            reason,
        };

        let parsed = Url::parse(uri).map_err(|e| invalid(e.to_string()))?;
        let path = match parsed.host_str() {
            Some(host) if !host.is_empty() => format!("/{host}{}", parsed.path()),
            _ => parsed.path().to_string(),
        };

        let (prefix, wrap): (&str, fn(String) -> Self) = match parsed.scheme() {
            CONFLUENCE_SCHEME => ("/page/", Self::Page),
            JIRA_SCHEME => ("/issue/", Self::Issue),
            other => return Err(invalid(format!("unknown resource scheme: {other}"))),
        };

        if !path.starts_with(prefix) {
            return Err(invalid(format!(
                "invalid {} resource path: {path}",
                parsed.scheme()
            )));
        }

        match path.rsplit('/').next() {
            Some(id) if !id.is_empty() => Ok(wrap(id.to_string())),
            _ => Err(invalid("missing identifier".into())),
        }
    }

    pub async fn fetch(&self, client: &AtlassianClient) -> Result<Value> {
        match self {
            Self::Page(page_id) => client.confluence_get_page(page_id).await,
            Self::Issue(issue_key) => client.jira_get_issue(issue_key).await,
        }
    }
}
