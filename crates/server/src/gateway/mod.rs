//! Remote data gateway client.
//!
//! The gateway is the managed backend (database + stored procedures) that
//! owns all durable state. Every operation handler consumes exactly two call
//! shapes from it: a named server-side procedure call, or a structured
//! read/write against a named table. The gateway is a black box - no
//! transaction semantics, ordering guarantees, or retry behavior are assumed
//! here.
//!
//! Handlers receive the gateway as an explicit capability
//! (`Arc<dyn Gateway>`) through their execution context rather than through
//! any process-global lookup.

mod http;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use http::HttpGateway;

use async_trait::async_trait;
use harvestly_core::UserId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when calling the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP transport failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with a non-success status.
    #[error("gateway returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not match the expected JSON shape.
    #[error("failed to decode gateway response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The gateway rejected the caller's bearer token.
    #[error("gateway rejected the bearer token")]
    AuthRejected,
}

/// A caller identity resolved by the gateway's auth endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
}

/// A structured read against a named table.
///
/// Filters use the gateway's `column=op.value` filter syntax; this codebase
/// only ever needs equality filters, so [`TableQuery::eq`] is the sole
/// filter constructor.
#[derive(Debug, Clone, Default)]
pub struct TableQuery {
    pub filters: Vec<(String, String)>,
    pub select: Option<String>,
    pub order: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl TableQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality filter on `column`.
    #[must_use]
    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters
            .push((column.to_string(), format!("eq.{}", value.to_string())));
        self
    }

    /// Restrict the returned columns.
    #[must_use]
    pub fn select(mut self, columns: &str) -> Self {
        self.select = Some(columns.to_string());
        self
    }

    /// Order by a clause like `created_at.desc`.
    #[must_use]
    pub fn order(mut self, clause: &str) -> Self {
        self.order = Some(clause.to_string());
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// A structured write against a named table.
#[derive(Debug, Clone)]
pub enum TableWrite {
    /// Insert a new row.
    Insert(Value),
    /// Insert a row, replacing an existing one on conflict with `on_conflict`.
    Upsert {
        payload: Value,
        on_conflict: String,
    },
    /// Update rows matching `(column, filter)` pairs, where the filter is a
    /// gateway expression like `eq.{value}`.
    Update {
        payload: Value,
        filters: Vec<(String, String)>,
    },
    /// Delete rows matching `(column, filter)` pairs.
    Delete { filters: Vec<(String, String)> },
}

/// The remote data gateway interface.
///
/// One production implementation ([`HttpGateway`]) talks to the managed
/// backend over HTTPS; tests use a scripted mock. Every method returns the
/// gateway's `(data, error)` pair as a `Result`.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Invoke a named server-side procedure with JSON params.
    async fn call_procedure(&self, name: &str, params: Value) -> Result<Value, GatewayError>;

    /// Read rows from a named table. Returns a JSON array of rows.
    async fn query_table(&self, table: &str, query: TableQuery) -> Result<Value, GatewayError>;

    /// Insert, upsert, update, or delete rows in a named table.
    async fn write_table(&self, table: &str, write: TableWrite) -> Result<Value, GatewayError>;

    /// Resolve a caller identity from a bearer token.
    async fn auth_user(&self, bearer_token: &str) -> Result<AuthUser, GatewayError>;

    /// Cheap connectivity probe used by the readiness endpoint.
    async fn ping(&self) -> Result<(), GatewayError>;
}
