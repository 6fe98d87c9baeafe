use serde_json::Value;

use crate::config::types::{Credentials, Service};
use crate::core::channel::Channel;
use crate::core::links;
use crate::error::{AtlassianError, Result};

pub const DEFAULT_SEARCH_LIMIT: u64 = 10;
pub const DEFAULT_SPACE_LIMIT: u64 = 50;

const PAGE_EXPAND: &str = "body.storage,space,version,ancestors";
const PAGE_SEARCH_EXPAND: &str = "space,version";
const SPACE_EXPAND: &str = "description,homepage";
const ISSUE_EXPAND: &str = "changelog,attachments,comments";
const ISSUE_SEARCH_EXPAND: &str = "changelog";
const PROJECT_EXPAND: &str = "description,lead,projectKeys";

/// Read-only client for the Confluence and Jira REST APIs.
///
/// Holds one channel per service that has a token. Operations against a
/// service without a channel fail with `NotConfigured`.
#[derive(Debug)]
pub struct AtlassianClient {
    confluence: Option<Channel>,
    jira: Option<Channel>,
}

impl AtlassianClient {
    pub fn new(credentials: &Credentials) -> Result<Self> {
        let base_url = credentials.base_url();
        let channel = |service: Service| {
            credentials
                .token(service)
                .map(|token| Channel::new(service, &base_url, &credentials.email, token))
                .transpose()
        };

        let client = Self {
            confluence: channel(Service::Confluence)?,
            jira: channel(Service::Jira)?,
        };
        tracing::info!(
            base_url = %base_url,
            confluence = client.confluence.is_some(),
            jira = client.jira.is_some(),
            "atlassian client ready"
        );
        Ok(client)
    }

    pub fn is_configured(&self, service: Service) -> bool {
        self.channel_slot(service).is_some()
    }

    /// Release every channel that was built. Safe to call more than once.
    pub fn close(&mut self) {
        for channel in [self.confluence.take(), self.jira.take()].into_iter().flatten() {
            tracing::debug!(service = %channel.service(), "closing channel");
        }
    }

    fn channel_slot(&self, service: Service) -> Option<&Channel> {
        match service {
            Service::Confluence => self.confluence.as_ref(),
            Service::Jira => self.jira.as_ref(),
        }
    }

    fn channel(&self, service: Service) -> Result<&Channel> {
        self.channel_slot(service)
            .ok_or(AtlassianError::NotConfigured {
                service,
                var: service.token_var(),
            })
    }

    // Confluence

    pub async fn confluence_get_page(&self, page_id: &str) -> Result<Value> {
        self.channel(Service::Confluence)?
            .get_json(
                &["wiki", "rest", "api", "content", page_id],
                &[("expand", PAGE_EXPAND.into())],
            )
            .await
    }

    pub async fn confluence_search_pages(&self, query: &str, limit: u64) -> Result<Vec<Value>> {
        let data = self
            .channel(Service::Confluence)?
            .get_json(
                &["wiki", "rest", "api", "content", "search"],
                &[
                    ("cql", format!("text ~ \"{query}\" and type = page")),
                    ("limit", limit.to_string()),
                    ("expand", PAGE_SEARCH_EXPAND.into()),
                ],
            )
            .await?;
        Ok(take_list(data, "results"))
    }

    pub async fn confluence_list_spaces(&self, limit: u64) -> Result<Vec<Value>> {
        let data = self
            .channel(Service::Confluence)?
            .get_json(
                &["wiki", "rest", "api", "space"],
                &[
                    ("limit", limit.to_string()),
                    ("expand", SPACE_EXPAND.into()),
                ],
            )
            .await?;
        Ok(take_list(data, "results"))
    }

    pub async fn confluence_get_page_by_url(&self, page_url: &str) -> Result<Value> {
        let page_id = links::page_id_from_url(page_url).ok_or_else(|| {
            AtlassianError::Resolution {
                target: "page ID",
                url: page_url.to_string(),
            }
        })?;
        self.confluence_get_page(&page_id).await
    }

    // Jira

    pub async fn jira_get_issue(&self, issue_key: &str) -> Result<Value> {
        self.channel(Service::Jira)?
            .get_json(
                &["rest", "api", "3", "issue", issue_key],
                &[("expand", ISSUE_EXPAND.into())],
            )
            .await
    }

    pub async fn jira_search_issues(&self, jql: &str, limit: u64) -> Result<Vec<Value>> {
        let data = self
            .channel(Service::Jira)?
            .get_json(
                &["rest", "api", "3", "search"],
                &[
                    ("jql", jql.to_string()),
                    ("maxResults", limit.to_string()),
                    ("expand", ISSUE_SEARCH_EXPAND.into()),
                ],
            )
            .await?;
        Ok(take_list(data, "issues"))
    }

    /// Projects come back as a bare JSON array and are passed through as is.
    pub async fn jira_list_projects(&self) -> Result<Value> {
        self.channel(Service::Jira)?
            .get_json(
                &["rest", "api", "3", "project"],
                &[("expand", PROJECT_EXPAND.into())],
            )
            .await
    }

    pub async fn jira_get_issue_by_url(&self, issue_url: &str) -> Result<Value> {
        let issue_key = links::issue_key_from_url(issue_url).ok_or_else(|| {
            AtlassianError::Resolution {
                target: "issue key",
                url: issue_url.to_string(),
            }
        })?;
        self.jira_get_issue(&issue_key).await
    }
}

/// Pull the list out of a paged envelope; a missing field is an empty page.
fn take_list(mut data: Value, field: &str) -> Vec<Value> {
    match data.get_mut(field).map(Value::take) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}
