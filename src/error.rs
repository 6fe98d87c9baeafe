use thiserror::Error;

use crate::config::types::Service;

/// Upstream response bodies are cut to this many characters in error messages.
pub const UPSTREAM_BODY_LIMIT: usize = 500;

#[derive(Error, Debug)]
pub enum AtlassianError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("{service} is not configured: set {var}")]
    NotConfigured { service: Service, var: &'static str },

    #[error("Could not extract {target} from URL: {url}")]
    Resolution { target: &'static str, url: String },

    #[error("invalid argument '{key}': {reason}")]
    InvalidArgument { key: String, reason: String },

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid resource URI '{uri}': {reason}")]
    InvalidResource { uri: String, reason: String },

    #[error("upstream returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl AtlassianError {
    pub fn missing_argument(key: &str) -> Self {
        Self::InvalidArgument {
            key: key.to_string(),
            reason: "missing required argument".into(),
        }
    }

    /// Build an `Upstream` error, truncating the body for diagnostics.
    pub fn upstream(status: u16, body: &str) -> Self {
        Self::Upstream {
            status,
            body: truncate_body(body),
        }
    }
}

fn truncate_body(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(UPSTREAM_BODY_LIMIT) {
        Some((cut, _)) => format!("{}…", &body[..cut]),
        None => body.to_string(),
    }
}

pub type Result<T> = std::result::Result<T, AtlassianError>;
