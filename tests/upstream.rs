mod common;

use std::sync::Arc;

use serde_json::{Value, json};

use atlassian_mcp::config::types::Service;
use atlassian_mcp::core::channel::basic_auth;
use atlassian_mcp::core::client::AtlassianClient;
use atlassian_mcp::core::probe::{self, ProbeStatus};
use atlassian_mcp::error::AtlassianError;
use atlassian_mcp::mcp::Dispatcher;
use atlassian_mcp::mcp::context::AppContext;
use atlassian_mcp::mcp::tools::Arguments;

use common::{CONFLUENCE_TOKEN, EMAIL, JIRA_TOKEN, credentials, spawn_upstream};

async fn client() -> AtlassianClient {
    let base = spawn_upstream().await;
    AtlassianClient::new(&credentials(&base, Some(CONFLUENCE_TOKEN), Some(JIRA_TOKEN))).unwrap()
}

async fn dispatcher(confluence: Option<&str>, jira: Option<&str>) -> Dispatcher {
    let base = spawn_upstream().await;
    Dispatcher::new(Arc::new(AppContext::new(credentials(&base, confluence, jira))))
}

fn args(value: Value) -> Arguments {
    match value {
        Value::Object(map) => map,
        _ => panic!("arguments must be an object"),
    }
}

#[tokio::test]
async fn get_page_sends_auth_and_expand() {
    let page = client().await.confluence_get_page("123456").await.unwrap();
    assert_eq!(page["id"], "123456");
    assert_eq!(page["expand"], "body.storage,space,version,ancestors");
    assert_eq!(page["authorization"], basic_auth(EMAIL, CONFLUENCE_TOKEN));
}

#[tokio::test]
async fn each_service_uses_its_own_token() {
    let client = client().await;
    let issue = client.jira_get_issue("PROJ-42").await.unwrap();
    assert_eq!(issue["key"], "PROJ-42");
    assert_eq!(issue["expand"], "changelog,attachments,comments");
    assert_eq!(issue["authorization"], basic_auth(EMAIL, JIRA_TOKEN));
}

#[tokio::test]
async fn search_pages_builds_cql() {
    let results = client().await.confluence_search_pages("roadmap", 5).await.unwrap();
    assert_eq!(
        results,
        vec![json!({
            "cql": "text ~ \"roadmap\" and type = page",
            "limit": "5",
            "expand": "space,version",
        })]
    );
}

#[tokio::test]
async fn search_pages_without_results_field_is_empty() {
    let results = client().await.confluence_search_pages("nothing", 5).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn list_spaces_returns_results() {
    let spaces = client().await.confluence_list_spaces(50).await.unwrap();
    assert_eq!(spaces.len(), 2);
    assert_eq!(spaces[0]["limit"], "50");
    assert_eq!(spaces[0]["expand"], "description,homepage");
}

#[tokio::test]
async fn search_issues_passes_jql_through() {
    let client = client().await;
    let issues = client
        .jira_search_issues("project = PROJ AND status = \"In Progress\"", 10)
        .await
        .unwrap();
    assert_eq!(issues[0]["jql"], "project = PROJ AND status = \"In Progress\"");
    assert_eq!(issues[0]["maxResults"], "10");
    assert_eq!(issues[0]["expand"], "changelog");

    let none = client.jira_search_issues("empty", 10).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn list_projects_returns_raw_array() {
    let projects = client().await.jira_list_projects().await.unwrap();
    let projects = projects.as_array().unwrap();
    assert_eq!(projects.len(), 3);
    assert_eq!(projects[0]["expand"], "description,lead,projectKeys");
}

#[tokio::test]
async fn by_url_operations_resolve_then_fetch() {
    let client = client().await;
    let page = client
        .confluence_get_page_by_url("https://acme.atlassian.net/wiki/spaces/ENG/pages/123456/Design")
        .await
        .unwrap();
    assert_eq!(page["id"], "123456");

    let issue = client
        .jira_get_issue_by_url(
            "https://acme.atlassian.net/jira/software/projects/PROJ/boards/1?selectedIssue=PROJ-42",
        )
        .await
        .unwrap();
    assert_eq!(issue["key"], "PROJ-42");
}

#[tokio::test]
async fn non_success_status_is_upstream_error() {
    let err = client().await.confluence_get_page("missing").await.unwrap_err();
    match err {
        AtlassianError::Upstream { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("No content found"));
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn tool_call_returns_pretty_json() {
    let dispatcher = dispatcher(Some(CONFLUENCE_TOKEN), Some(JIRA_TOKEN)).await;
    let text = dispatcher
        .call_tool("jira_get_issue", &args(json!({"issue_key": "OPS-7"})))
        .await;

    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["key"], "OPS-7");
    assert_eq!(text, serde_json::to_string_pretty(&value).unwrap());
    assert!(text.contains("\n  \"key\": \"OPS-7\""));
}

#[tokio::test]
async fn tool_call_applies_default_limits() {
    let dispatcher = dispatcher(Some(CONFLUENCE_TOKEN), None).await;

    let text = dispatcher.call_tool("confluence_list_spaces", &Arguments::new()).await;
    let spaces: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(spaces[0]["limit"], "50");

    let text = dispatcher
        .call_tool("confluence_search_pages", &args(json!({"query": "roadmap"})))
        .await;
    let results: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(results[0]["limit"], "10");
}

#[tokio::test]
async fn tool_call_with_empty_search_returns_empty_list() {
    let dispatcher = dispatcher(Some(CONFLUENCE_TOKEN), None).await;
    let text = dispatcher
        .call_tool("confluence_search_pages", &args(json!({"query": "nothing", "limit": 5})))
        .await;
    assert_eq!(text, "[]");
}

#[tokio::test]
async fn tool_call_failures_are_text() {
    let dispatcher = dispatcher(Some(CONFLUENCE_TOKEN), None).await;

    let text = dispatcher
        .call_tool("confluence_get_page", &args(json!({"page_id": "missing"})))
        .await;
    assert!(text.starts_with("Error: upstream returned HTTP 404"), "{text}");

    let text = dispatcher
        .call_tool("jira_get_issue", &args(json!({"issue_key": "PROJ-1"})))
        .await;
    assert_eq!(text, "Error: Jira is not configured: set ATLASSIAN_JIRA_TOKEN");

    let text = dispatcher
        .call_tool("confluence_get_page_by_url", &args(json!({"url": "https://example.com/"})))
        .await;
    assert_eq!(
        text,
        "Error: Could not extract page ID from URL: https://example.com/"
    );

    let text = dispatcher.call_tool("jira_delete_issue", &Arguments::new()).await;
    assert_eq!(text, "Error: Unknown tool: jira_delete_issue");
}

#[tokio::test]
async fn read_resource_fetches_entity() {
    let dispatcher = dispatcher(Some(CONFLUENCE_TOKEN), Some(JIRA_TOKEN)).await;

    let text = dispatcher.read_resource("confluence://page/42").await.unwrap();
    let page: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(page["id"], "42");

    let text = dispatcher.read_resource("jira://issue/PROJ-9").await.unwrap();
    let issue: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(issue["key"], "PROJ-9");
}

#[tokio::test]
async fn probe_reports_each_service() {
    let base = spawn_upstream().await;
    let client = AtlassianClient::new(&credentials(&base, Some(CONFLUENCE_TOKEN), None)).unwrap();

    let reports = probe::probe_all(&client).await;
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].service, Service::Confluence);
    assert_eq!(reports[0].status, ProbeStatus::Ok);
    assert_eq!(reports[0].detail, "2 spaces visible");
    assert_eq!(reports[1].service, Service::Jira);
    assert_eq!(reports[1].status, ProbeStatus::Skipped);
    assert!(reports[1].detail.contains("ATLASSIAN_JIRA_TOKEN"));
}

#[tokio::test]
async fn probe_reports_rejected_credentials() {
    let base = spawn_upstream().await;
    let client = AtlassianClient::new(&credentials(&base, Some("revoked"), Some("revoked"))).unwrap();

    let reports = probe::probe_all(&client).await;
    assert!(reports.iter().all(|r| r.status == ProbeStatus::Failed));
    assert!(reports[0].detail.contains("401"));

    let client = AtlassianClient::new(&credentials(&base, None, Some(JIRA_TOKEN))).unwrap();
    let jira = probe::probe(&client, Service::Jira).await;
    assert_eq!(jira.status, ProbeStatus::Ok);
    assert_eq!(jira.detail, "3 projects visible");
}
