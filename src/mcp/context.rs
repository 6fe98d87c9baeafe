use tokio::sync::OnceCell;

use crate::config::types::Credentials;
use crate::core::client::AtlassianClient;
use crate::error::Result;

/// Lifecycle of the shared client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Uninitialized,
    Ready,
}

/// Application context handed to the dispatch layer.
///
/// Credentials are resolved before the server starts. The client is built on
/// first use and then shared for the life of the process; concurrent first
/// calls wait on the same initialization.
#[derive(Debug)]
pub struct AppContext {
    credentials: Credentials,
    client: OnceCell<AtlassianClient>,
}

impl AppContext {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            client: OnceCell::new(),
        }
    }

    pub fn state(&self) -> ContextState {
        if self.client.initialized() {
            ContextState::Ready
        } else {
            ContextState::Uninitialized
        }
    }

    pub async fn client(&self) -> Result<&AtlassianClient> {
        self.client
            .get_or_try_init(|| async {
                tracing::info!("initializing atlassian client");
                AtlassianClient::new(&self.credentials)
            })
            .await
    }

    /// Close the client's channels if it was ever built.
    pub fn shutdown(&mut self) {
        match self.client.take() {
            Some(mut client) => {
                client.close();
                tracing::info!("atlassian client closed");
            }
            None => tracing::debug!("atlassian client was never initialized"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn credentials() -> Credentials {
        Credentials {
            domain: "acme.atlassian.net".into(),
            email: "dev@acme.test".into(),
            confluence_token: Some("c".into()),
            jira_token: None,
        }
    }

    #[tokio::test]
    async fn client_is_built_on_first_use() {
        let ctx = AppContext::new(credentials());
        assert_eq!(ctx.state(), ContextState::Uninitialized);

        ctx.client().await.unwrap();
        assert_eq!(ctx.state(), ContextState::Ready);
    }

    #[tokio::test]
    async fn concurrent_first_calls_share_one_client() {
        let ctx = Arc::new(AppContext::new(credentials()));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ctx = Arc::clone(&ctx);
                tokio::spawn(async move {
                    let client = ctx.client().await.unwrap();
                    client as *const AtlassianClient as usize
                })
            })
            .collect();

        let mut addresses = Vec::new();
        for handle in handles {
            addresses.push(handle.await.unwrap());
        }
        addresses.dedup();
        assert_eq!(addresses.len(), 1);
    }

    #[tokio::test]
    async fn shutdown_releases_the_client_and_is_repeatable() {
        let mut ctx = AppContext::new(credentials());
        ctx.shutdown();
        ctx.client().await.unwrap();
        ctx.shutdown();
        assert_eq!(ctx.state(), ContextState::Uninitialized);
        ctx.shutdown();
    }
}
