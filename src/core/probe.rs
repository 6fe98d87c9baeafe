use serde::Serialize;

use crate::config::types::Service;
use crate::core::client::AtlassianClient;

/// Spaces requested when probing Confluence.
pub const PROBE_SPACE_LIMIT: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Ok,
    Skipped,
    Failed,
}

/// Outcome of checking one service's credentials against the live API.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub service: Service,
    pub status: ProbeStatus,
    pub detail: String,
}

/// Check every service with one cheap read each.
pub async fn probe_all(client: &AtlassianClient) -> Vec<ProbeReport> {
    let mut reports = Vec::with_capacity(Service::ALL.len());
    for service in Service::ALL {
        reports.push(probe(client, service).await);
    }
    reports
}

pub async fn probe(client: &AtlassianClient, service: Service) -> ProbeReport {
    let report = |status, detail: String| ProbeReport {
        service,
        status,
        detail,
    };

    if !client.is_configured(service) {
        return report(
            ProbeStatus::Skipped,
            format!("no token configured ({})", service.token_var()),
        );
    }

    let outcome = match service {
        Service::Confluence => client
            .confluence_list_spaces(PROBE_SPACE_LIMIT)
            .await
            .map(|spaces| format!("{} spaces visible", spaces.len())),
        Service::Jira => client.jira_list_projects().await.map(|projects| {
            let count = projects.as_array().map_or(0, Vec::len);
            format!("{count} projects visible")
        }),
    };

    match outcome {
        Ok(detail) => report(ProbeStatus::Ok, detail),
        Err(err) => {
            tracing::warn!(service = %service, error = %err, "probe failed");
            report(ProbeStatus::Failed, err.to_string())
        }
    }
}
