//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::gateway::{Gateway, HttpGateway};
use crate::rpc::Registry;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the configuration, the gateway
/// client, and the operation registry.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    gateway: Arc<dyn Gateway>,
    registry: Registry,
}

impl AppState {
    /// Create application state backed by the HTTP gateway client.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let gateway: Arc<dyn Gateway> = Arc::new(HttpGateway::new(&config.gateway));
        Self::with_gateway(config, gateway)
    }

    /// Create application state with a caller-supplied gateway.
    ///
    /// Used by tests to substitute a scripted gateway.
    #[must_use]
    pub fn with_gateway(config: ServerConfig, gateway: Arc<dyn Gateway>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                gateway,
                registry: Registry::new(),
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a handle to the gateway client.
    #[must_use]
    pub fn gateway(&self) -> Arc<dyn Gateway> {
        Arc::clone(&self.inner.gateway)
    }

    /// Get a reference to the operation registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }
}
