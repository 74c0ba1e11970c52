//! Gateway connectivity commands.
//!
//! # Usage
//!
//! ```bash
//! harvestly gateway ping
//! ```
//!
//! # Environment Variables
//!
//! - `GATEWAY_URL` - Base URL of the remote data gateway
//! - `GATEWAY_ANON_KEY` - Public API key
//! - `GATEWAY_SERVICE_KEY` - Service role key
//!
//! Reads the same variables as the server, so a successful ping means the
//! server would start cleanly with this environment.

use std::time::Instant;

use harvestly_server::config::{ConfigError, ServerConfig};
use harvestly_server::gateway::{Gateway, GatewayError, HttpGateway};
use thiserror::Error;

/// Errors that can occur while probing the gateway.
#[derive(Debug, Error)]
pub enum PingError {
    /// Configuration could not be loaded from the environment.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The gateway rejected or failed the probe.
    #[error("Gateway unreachable: {0}")]
    Gateway(#[from] GatewayError),
}

/// Probe the remote data gateway with the configured credentials.
pub async fn ping() -> Result<(), PingError> {
    let config = ServerConfig::from_env()?;
    let gateway = HttpGateway::new(&config.gateway);

    println!("Pinging gateway at {} ...", config.gateway.url);

    let started = Instant::now();
    gateway.ping().await?;
    let elapsed = started.elapsed();

    println!("Gateway OK ({} ms)", elapsed.as_millis());
    Ok(())
}
