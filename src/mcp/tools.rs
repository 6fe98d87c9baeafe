// MCP tool table.
//
// Each tool name maps to exactly one `ToolKind`; `ToolCall::parse` validates
// the arguments for that kind and `ToolCall::execute` runs the bound client
// operation. Names and input schemas are the wire contract with the agent.

use serde_json::{Map, Value, json};

use crate::core::client::{AtlassianClient, DEFAULT_SEARCH_LIMIT, DEFAULT_SPACE_LIMIT};
use crate::error::{AtlassianError, Result};

pub type Arguments = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    ConfluenceGetPage,
    ConfluenceSearchPages,
    ConfluenceListSpaces,
    ConfluenceGetPageByUrl,
    JiraGetIssue,
    JiraSearchIssues,
    JiraListProjects,
    JiraGetIssueByUrl,
}

impl ToolKind {
    /// Every tool, in the order they are advertised.
    pub const ALL: [ToolKind; 8] = [
        ToolKind::ConfluenceGetPage,
        ToolKind::ConfluenceSearchPages,
        ToolKind::ConfluenceListSpaces,
        ToolKind::ConfluenceGetPageByUrl,
        ToolKind::JiraGetIssue,
        ToolKind::JiraSearchIssues,
        ToolKind::JiraListProjects,
        ToolKind::JiraGetIssueByUrl,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::ConfluenceGetPage => "confluence_get_page",
            Self::ConfluenceSearchPages => "confluence_search_pages",
            Self::ConfluenceListSpaces => "confluence_list_spaces",
            Self::ConfluenceGetPageByUrl => "confluence_get_page_by_url",
            Self::JiraGetIssue => "jira_get_issue",
            Self::JiraSearchIssues => "jira_search_issues",
            Self::JiraListProjects => "jira_list_projects",
            Self::JiraGetIssueByUrl => "jira_get_issue_by_url",
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::ConfluenceGetPage => "Get a specific Confluence page by ID",
            Self::ConfluenceSearchPages => "Search for pages in Confluence",
            Self::ConfluenceListSpaces => "List all available Confluence spaces",
            Self::ConfluenceGetPageByUrl => "Get a Confluence page by its URL",
            Self::JiraGetIssue => "Get a specific Jira issue by key",
            Self::JiraSearchIssues => "Search for issues using JQL (Jira Query Language)",
            Self::JiraListProjects => "List all available Jira projects",
            Self::JiraGetIssueByUrl => "Get a Jira issue by its URL",
        }
    }

    /// JSON schema for the tool's arguments.
    pub fn input_schema(&self) -> Value {
        match self {
            Self::ConfluenceGetPage => object_schema(
                json!({
                    "page_id": string_property("The ID of the Confluence page"),
                }),
                &["page_id"],
            ),
            Self::ConfluenceSearchPages => object_schema(
                json!({
                    "query": string_property("Search query for pages"),
                    "limit": limit_property("Maximum number of results to return", DEFAULT_SEARCH_LIMIT),
                }),
                &["query"],
            ),
            Self::ConfluenceListSpaces => object_schema(
                json!({
                    "limit": limit_property("Maximum number of spaces to return", DEFAULT_SPACE_LIMIT),
                }),
                &[],
            ),
            Self::ConfluenceGetPageByUrl => object_schema(
                json!({
                    "url": string_property("The full URL of the Confluence page"),
                }),
                &["url"],
            ),
            Self::JiraGetIssue => object_schema(
                json!({
                    "issue_key": string_property("The key of the Jira issue (e.g., PROJ-123)"),
                }),
                &["issue_key"],
            ),
            Self::JiraSearchIssues => object_schema(
                json!({
                    "jql": string_property("JQL query string"),
                    "limit": limit_property("Maximum number of results to return", DEFAULT_SEARCH_LIMIT),
                }),
                &["jql"],
            ),
            Self::JiraListProjects => object_schema(json!({}), &[]),
            Self::JiraGetIssueByUrl => object_schema(
                json!({
                    "url": string_property("The full URL of the Jira issue"),
                }),
                &["url"],
            ),
        }
    }
}

fn string_property(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

fn limit_property(description: &str, default: u64) -> Value {
    json!({ "type": "integer", "description": description, "default": default })
}

fn object_schema(properties: Value, required: &[&str]) -> Value {
    let mut schema = json!({ "type": "object", "properties": properties });
    if !required.is_empty() {
        schema["required"] = json!(required);
    }
    schema
}

/// A validated invocation, ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    ConfluenceGetPage { page_id: String },
    ConfluenceSearchPages { query: String, limit: u64 },
    ConfluenceListSpaces { limit: u64 },
    ConfluenceGetPageByUrl { url: String },
    JiraGetIssue { issue_key: String },
    JiraSearchIssues { jql: String, limit: u64 },
    JiraListProjects,
    JiraGetIssueByUrl { url: String },
}

impl ToolCall {
    pub fn parse(name: &str, args: &Arguments) -> Result<Self> {
        let kind =
            ToolKind::from_name(name).ok_or_else(|| AtlassianError::UnknownTool(name.to_string()))?;

        Ok(match kind {
            ToolKind::ConfluenceGetPage => Self::ConfluenceGetPage {
                page_id: required_str(args, "page_id")?,
            },
            ToolKind::ConfluenceSearchPages => Self::ConfluenceSearchPages {
                query: required_str(args, "query")?,
                limit: optional_limit(args, DEFAULT_SEARCH_LIMIT)?,
            },
            ToolKind::ConfluenceListSpaces => Self::ConfluenceListSpaces {
                limit: optional_limit(args, DEFAULT_SPACE_LIMIT)?,
            },
            ToolKind::ConfluenceGetPageByUrl => Self::ConfluenceGetPageByUrl {
                url: required_str(args, "url")?,
            },
            ToolKind::JiraGetIssue => Self::JiraGetIssue {
                issue_key: required_str(args, "issue_key")?,
            },
            ToolKind::JiraSearchIssues => Self::JiraSearchIssues {
                jql: required_str(args, "jql")?,
                limit: optional_limit(args, DEFAULT_SEARCH_LIMIT)?,
            },
            ToolKind::JiraListProjects => Self::JiraListProjects,
            ToolKind::JiraGetIssueByUrl => Self::JiraGetIssueByUrl {
                url: required_str(args, "url")?,
            },
        })
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            Self::ConfluenceGetPage { .. } => ToolKind::ConfluenceGetPage,
            Self::ConfluenceSearchPages { .. } => ToolKind::ConfluenceSearchPages,
            Self::ConfluenceListSpaces { .. } => ToolKind::ConfluenceListSpaces,
            Self::ConfluenceGetPageByUrl { .. } => ToolKind::ConfluenceGetPageByUrl,
            Self::JiraGetIssue { .. } => ToolKind::JiraGetIssue,
            Self::JiraSearchIssues { .. } => ToolKind::JiraSearchIssues,
            Self::JiraListProjects => ToolKind::JiraListProjects,
            Self::JiraGetIssueByUrl { .. } => ToolKind::JiraGetIssueByUrl,
        }
    }

    pub async fn execute(&self, client: &AtlassianClient) -> Result<Value> {
        Ok(match self {
            Self::ConfluenceGetPage { page_id } => client.confluence_get_page(page_id).await?,
            Self::ConfluenceSearchPages { query, limit } => {
                Value::Array(client.confluence_search_pages(query, *limit).await?)
            }
            Self::ConfluenceListSpaces { limit } => {
                Value::Array(client.confluence_list_spaces(*limit).await?)
            }
            Self::ConfluenceGetPageByUrl { url } => client.confluence_get_page_by_url(url).await?,
            Self::JiraGetIssue { issue_key } => client.jira_get_issue(issue_key).await?,
            Self::JiraSearchIssues { jql, limit } => {
                Value::Array(client.jira_search_issues(jql, *limit).await?)
            }
            Self::JiraListProjects => client.jira_list_projects().await?,
            Self::JiraGetIssueByUrl { url } => client.jira_get_issue_by_url(url).await?,
        })
    }
}

/// Required string argument. Numbers are accepted and rendered as text so
/// numeric page IDs work.
fn required_str(args: &Arguments, key: &str) -> Result<String> {
    let invalid = |reason: &str| AtlassianError::InvalidArgument {
        key: key.to_string(),
        reason: reason.to_string(),
    };

    match args.get(key) {
        None | Some(Value::Null) => Err(AtlassianError::missing_argument(key)),
        Some(Value::String(s)) if s.trim().is_empty() => Err(invalid("must not be empty")),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(_) => Err(invalid("expected a string")),
    }
}

fn optional_limit(args: &Arguments, default: u64) -> Result<u64> {
    match args.get("limit") {
        None | Some(Value::Null) => Ok(default),
        Some(value) => value.as_u64().filter(|n| *n > 0).ok_or_else(|| {
            AtlassianError::InvalidArgument {
                key: "limit".into(),
                reason: format!("expected a positive integer, got {value}"),
            }
        }),
    }
}
