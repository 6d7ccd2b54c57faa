use std::sync::Arc;

use loregraph_common::{Error, Result, StoreConfig};
use neo4rs::Graph;
use tokio::sync::Mutex;

/// Owns the shared Bolt handle for one graph store.
///
/// Constructed once and handed to the engine; there is no global state.
/// The first `session` call connects with the configured endpoint and
/// credentials, later calls clone the cached handle. The driver pools
/// connections internally and is safe for concurrent session creation.
pub struct StoreConnector {
    config: StoreConfig,
    handle: Mutex<Option<Arc<Graph>>>,
}

impl StoreConnector {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            handle: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Hand out a session scoped to one operation.
    ///
    /// Sessions are cheap clones of the shared handle and are never shared
    /// across operations; dropping the clone releases the session on every
    /// exit path, success or failure.
    pub async fn session(&self) -> Result<Arc<Graph>> {
        let mut slot = self.handle.lock().await;
        if let Some(graph) = slot.as_ref() {
            return Ok(Arc::clone(graph));
        }

        let graph = Graph::new(
            self.config.uri.as_str(),
            self.config.user.as_str(),
            self.config.password.as_str(),
        )
        .await
        .map_err(|e| Error::connection(self.config.uri.clone(), e))?;
        let graph = Arc::new(graph);
        *slot = Some(Arc::clone(&graph));
        tracing::debug!(uri = %self.config.uri, "connected to graph store");
        Ok(graph)
    }

    /// Drop the cached handle. A later `session` reconnects transparently;
    /// operations already holding a session keep it until they finish.
    pub async fn shutdown(&self) {
        let mut slot = self.handle.lock().await;
        if slot.take().is_some() {
            tracing::debug!("graph store handle released");
        }
    }
}
