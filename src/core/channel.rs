use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use url::Url;

use crate::config::types::Service;
use crate::error::{AtlassianError, Result};

/// Fixed per-request timeout for every upstream call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One authenticated HTTP transport bound to a single service token.
///
/// Long-lived: the underlying client pools connections and is reused for
/// every request against its service.
#[derive(Debug, Clone)]
pub struct Channel {
    service: Service,
    base_url: Url,
    http: reqwest::Client,
}

impl Channel {
    pub fn new(service: Service, base_url: &str, email: &str, token: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            AtlassianError::Configuration(format!("invalid base URL '{base_url}': {e}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AtlassianError::Configuration(format!(
                "base URL '{base_url}' cannot carry a path"
            )));
        }

        let mut auth = HeaderValue::from_str(&basic_auth(email, token))
            .map_err(|e| AtlassianError::Configuration(format!("invalid auth header: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            service,
            base_url,
            http,
        })
    }

    pub fn service(&self) -> Service {
        self.service
    }

    /// Build the URL for `segments` under the base URL. Each segment is
    /// percent-encoded, so identifiers cannot escape their path position.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// GET a JSON document. Any non-2xx status becomes `Upstream`.
    pub async fn get_json(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Value> {
        let url = self.endpoint(segments);
        tracing::debug!(service = %self.service, url = %url, "GET");

        let response = self.http.get(url).query(query).send().await?;
        let status = response.status();
        tracing::debug!(service = %self.service, status = status.as_u16(), "response");

        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!(service = %self.service, error = %e, "could not read error body");
                    String::new()
                }
            };
            return Err(AtlassianError::upstream(status.as_u16(), &body));
        }

        Ok(response.json().await?)
    }
}

/// `Authorization` value for HTTP Basic auth with an API token.
pub fn basic_auth(email: &str, token: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{email}:{token}")))
}
