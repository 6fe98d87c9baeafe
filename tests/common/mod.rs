//! Fake Atlassian REST API for integration tests.
//!
//! Every handler echoes what it received (query parameters and the
//! `Authorization` header) so tests can assert on the exact request.

use std::collections::HashMap;

use axum::Router;
use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use atlassian_mcp::config::{self, types::Credentials};

pub const EMAIL: &str = "dev@acme.test";
pub const CONFLUENCE_TOKEN: &str = "conf-token";
pub const JIRA_TOKEN: &str = "jira-token";

type Params = Query<HashMap<String, String>>;

fn auth(headers: &HeaderMap) -> Value {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map_or(Value::Null, |v| Value::String(v.to_string()))
}

fn forbidden(headers: &HeaderMap) -> bool {
    auth(headers)
        .as_str()
        .is_some_and(|v| v == atlassian_mcp::core::channel::basic_auth(EMAIL, "revoked"))
}

async fn get_page(Path(id): Path<String>, Query(q): Params, headers: HeaderMap) -> Response {
    if id == "missing" {
        return (
            StatusCode::NOT_FOUND,
            "{\"message\":\"No content found with id: missing\"}",
        )
            .into_response();
    }
    axum::Json(json!({
        "id": id,
        "type": "page",
        "expand": q.get("expand"),
        "authorization": auth(&headers),
    }))
    .into_response()
}

async fn search_pages(Query(q): Params) -> Response {
    let cql = q.get("cql").cloned().unwrap_or_default();
    if cql.contains("nothing") {
        return axum::Json(json!({ "size": 0 })).into_response();
    }
    axum::Json(json!({
        "results": [{
            "cql": cql,
            "limit": q.get("limit"),
            "expand": q.get("expand"),
        }],
        "size": 1,
    }))
    .into_response()
}

async fn list_spaces(Query(q): Params, headers: HeaderMap) -> Response {
    if forbidden(&headers) {
        return (StatusCode::UNAUTHORIZED, "Basic authentication failed").into_response();
    }
    axum::Json(json!({
        "results": [
            { "key": "ENG", "limit": q.get("limit"), "expand": q.get("expand") },
            { "key": "OPS" },
        ],
    }))
    .into_response()
}

async fn get_issue(Path(key): Path<String>, Query(q): Params, headers: HeaderMap) -> Response {
    axum::Json(json!({
        "key": key,
        "expand": q.get("expand"),
        "authorization": auth(&headers),
    }))
    .into_response()
}

async fn search_issues(Query(q): Params) -> Response {
    let jql = q.get("jql").cloned().unwrap_or_default();
    if jql == "empty" {
        return axum::Json(json!({ "total": 0 })).into_response();
    }
    axum::Json(json!({
        "issues": [{
            "jql": jql,
            "maxResults": q.get("maxResults"),
            "expand": q.get("expand"),
        }],
    }))
    .into_response()
}

async fn list_projects(Query(q): Params, headers: HeaderMap) -> Response {
    if forbidden(&headers) {
        return (StatusCode::UNAUTHORIZED, "Client must be authenticated").into_response();
    }
    axum::Json(json!([
        { "key": "PROJ", "expand": q.get("expand") },
        { "key": "OPS" },
        { "key": "SD" },
    ]))
    .into_response()
}

/// Spawn the fake API on an ephemeral port and return its base URL.
pub async fn spawn_upstream() -> String {
    let app = Router::new()
        .route("/wiki/rest/api/content/search", get(search_pages))
        .route("/wiki/rest/api/content/{id}", get(get_page))
        .route("/wiki/rest/api/space", get(list_spaces))
        .route("/rest/api/3/issue/{key}", get(get_issue))
        .route("/rest/api/3/search", get(search_issues))
        .route("/rest/api/3/project", get(list_projects));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Resolve credentials for the fake API through the real resolver.
pub fn credentials(base_url: &str, confluence: Option<&str>, jira: Option<&str>) -> Credentials {
    let mut env = HashMap::from([
        (config::DOMAIN_VAR, base_url.to_string()),
        (config::EMAIL_VAR, EMAIL.to_string()),
    ]);
    if let Some(token) = confluence {
        env.insert(config::CONFLUENCE_TOKEN_VAR, token.to_string());
    }
    if let Some(token) = jira {
        env.insert(config::JIRA_TOKEN_VAR, token.to_string());
    }
    config::resolve_with(|key| env.get(key).cloned()).unwrap()
}
