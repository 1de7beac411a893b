//! Lazy, once-only construction of the generation client.

use super::server::Timeouts;
use super::{GenerationClient, Result, ServerClient};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, instrument};
use url::Url;

/// Builds a ready-to-use client. Called at most once per successful load.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    async fn build(&self) -> Result<Arc<dyn GenerationClient>>;
}

/// Connects to a model server that already holds the base model and the
/// adapter, checks it is healthy and switches the adapter on.
#[derive(Debug, Clone)]
pub struct ServerFactory {
    pub url: Url,
    pub timeouts: Timeouts,
    pub base_model: String,
    pub adapter: Option<String>,
}

#[async_trait]
impl ClientFactory for ServerFactory {
    #[instrument(skip(self), fields(server = %self.url, base_model = %self.base_model))]
    async fn build(&self) -> Result<Arc<dyn GenerationClient>> {
        let client = ServerClient::new(&self.url, self.timeouts)?;
        client.health().await?;
        if let Some(adapter) = &self.adapter {
            client.activate_adapter(adapter).await?;
        }
        info!("Generation client ready");
        Ok(Arc::new(client))
    }
}

/// Memoizes the client behind a one-time-init cell.
///
/// Failed loads are not cached, so the next `get` tries again.
pub struct ModelLoader {
    factory: Box<dyn ClientFactory>,
    client: OnceCell<Arc<dyn GenerationClient>>,
}

impl ModelLoader {
    pub fn new<F>(factory: F) -> Self
    where
        F: ClientFactory + 'static,
    {
        Self {
            factory: Box::new(factory),
            client: OnceCell::new(),
        }
    }

    pub async fn get(&self) -> Result<Arc<dyn GenerationClient>> {
        self.client
            .get_or_try_init(|| self.factory.build())
            .await
            .map(Arc::clone)
    }

    pub fn is_loaded(&self) -> bool {
        self.client.initialized()
    }
}
