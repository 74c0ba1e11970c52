//! The operation registry and dispatcher.
//!
//! Every backend operation follows the same request/response procedure
//! pattern: a stable dotted name, a declared mode (query or mutation), an
//! authorization tier (public or protected), a schema-validated input, and
//! a handler that performs at most a couple of gateway calls before shaping
//! the result.
//!
//! Dispatch order per request: resolve the operation by name, check the
//! authorization tier against the resolved caller identity, deserialize and
//! validate the input, then run the handler. Tier and validation failures
//! reject before the handler body runs, so no handler ever sees a caller
//! without identity or a malformed input - and neither failure reaches the
//! gateway.
//!
//! Two result-shaping conventions coexist deliberately (see the individual
//! operations): most operations surface gateway failures as a generic
//! operation-failed error, while the soft reads (counters, loyalty points,
//! unread counts, analytics, view tracking) log the failure and return a
//! success-shaped result with zero/empty defaults. The choice is per
//! operation, not a global rule.

pub mod farms;
pub mod loyalty;
pub mod notifications;
pub mod products;
pub mod search;
mod validate;
pub mod wallet;
pub mod wishlist;

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use harvestly_core::UserId;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::gateway::{AuthUser, Gateway};
use crate::middleware::OptionalUser;
use crate::state::AppState;

// =============================================================================
// Operation declarations
// =============================================================================

/// Whether an operation reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OpMode {
    Query,
    Mutation,
}

/// Authorization tier for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthTier {
    /// No caller identity required.
    Public,
    /// Requires a resolved caller identity.
    Protected,
}

/// Per-request execution context handed to every handler.
///
/// The gateway is passed explicitly as a capability; there is no ambient
/// global client.
#[derive(Clone)]
pub struct OpContext {
    pub gateway: Arc<dyn Gateway>,
    pub user: Option<AuthUser>,
}

impl OpContext {
    /// The resolved caller id.
    ///
    /// Dispatch rejects protected operations before the handler runs, so for
    /// protected handlers this cannot fail in practice; the `Result` keeps
    /// the invariant checkable instead of unwrapped.
    pub fn user_id(&self) -> Result<UserId> {
        self.user
            .as_ref()
            .map(|user| user.id)
            .ok_or_else(|| AppError::Unauthorized("authentication required".to_string()))
    }
}

/// Validated operation input.
///
/// Implementations perform the per-field shape checks (non-empty strings,
/// bounded numbers, collection lengths) that serde's type checking does not
/// cover. Enum membership and numeric types are enforced by deserialization
/// itself.
pub trait ValidateInput {
    /// Check declared constraints, returning a validation error on the first
    /// violated one.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

type OpFuture = Pin<Box<dyn Future<Output = Result<Value>> + Send>>;
type BoxedHandler = Box<dyn Fn(OpContext, Value) -> OpFuture + Send + Sync>;

/// A single named operation: declaration plus type-erased handler.
pub struct OperationDef {
    pub name: &'static str,
    pub mode: OpMode,
    pub tier: AuthTier,
    handler: BoxedHandler,
}

impl OperationDef {
    /// Declare a read-only operation.
    pub fn query<I, T, F, Fut>(name: &'static str, tier: AuthTier, f: F) -> Self
    where
        I: DeserializeOwned + ValidateInput + Send + 'static,
        T: Serialize + 'static,
        F: Fn(OpContext, I) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        Self::new(name, OpMode::Query, tier, f)
    }

    /// Declare a side-effecting operation.
    pub fn mutation<I, T, F, Fut>(name: &'static str, tier: AuthTier, f: F) -> Self
    where
        I: DeserializeOwned + ValidateInput + Send + 'static,
        T: Serialize + 'static,
        F: Fn(OpContext, I) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        Self::new(name, OpMode::Mutation, tier, f)
    }

    fn new<I, T, F, Fut>(name: &'static str, mode: OpMode, tier: AuthTier, f: F) -> Self
    where
        I: DeserializeOwned + ValidateInput + Send + 'static,
        T: Serialize + 'static,
        F: Fn(OpContext, I) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let handler: BoxedHandler = Box::new(move |ctx, raw| {
            let f = f.clone();
            Box::pin(async move {
                // Operations without inputs accept a missing body
                let raw = if raw.is_null() {
                    Value::Object(serde_json::Map::new())
                } else {
                    raw
                };

                let input: I = serde_json::from_value(raw)?;
                input.validate()?;

                let output = f(ctx, input).await?;
                serde_json::to_value(output)
                    .map_err(|e| AppError::Internal(format!("failed to serialize result: {e}")))
            })
        });

        Self {
            name,
            mode,
            tier,
            handler,
        }
    }
}

// =============================================================================
// Registry
// =============================================================================

/// The fixed set of named operations.
pub struct Registry {
    ops: Vec<OperationDef>,
    index: HashMap<&'static str, usize>,
}

impl Registry {
    /// Build the full operation registry.
    #[must_use]
    pub fn new() -> Self {
        let mut ops = Vec::new();
        ops.extend(products::operations());
        ops.extend(farms::operations());
        ops.extend(wallet::operations());
        ops.extend(loyalty::operations());
        ops.extend(notifications::operations());
        ops.extend(wishlist::operations());
        ops.extend(search::operations());

        let mut index = HashMap::new();
        for (i, op) in ops.iter().enumerate() {
            let previous = index.insert(op.name, i);
            debug_assert!(previous.is_none(), "duplicate operation name: {}", op.name);
        }

        Self { ops, index }
    }

    /// Look up an operation by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OperationDef> {
        self.index.get(name).and_then(|&i| self.ops.get(i))
    }

    /// Iterate over all declared operations.
    pub fn operations(&self) -> impl Iterator<Item = &OperationDef> {
        self.ops.iter()
    }

    /// Number of declared operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Dispatch a request to exactly one handler by name.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no operation has the given name
    /// - `Unauthorized` if the operation is protected and no identity is
    ///   resolved (before any handler logic runs)
    /// - `Validation` if the input fails its declared shape (before any
    ///   gateway call)
    /// - whatever the handler itself surfaces
    pub async fn dispatch(&self, name: &str, ctx: OpContext, input: Value) -> Result<Value> {
        let op = self
            .get(name)
            .ok_or_else(|| AppError::NotFound(format!("unknown operation: {name}")))?;

        if op.tier == AuthTier::Protected && ctx.user.is_none() {
            tracing::warn!(operation = name, "Protected operation called without identity");
            return Err(AppError::Unauthorized("authentication required".to_string()));
        }

        tracing::debug!(operation = name, mode = ?op.mode, "Dispatching operation");
        let result = (op.handler)(ctx, input).await;
        match &result {
            Ok(_) => tracing::debug!(operation = name, "Operation succeeded"),
            Err(e) => tracing::info!(operation = name, error = %e, "Operation failed"),
        }
        result
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Shared result shapes and row decoding
// =============================================================================

/// Generic acknowledgement for mutations with no meaningful payload.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    pub(crate) const OK: Self = Self { success: true };
}

/// Decode a gateway row set into typed records.
///
/// A shape mismatch here means the gateway schema drifted from this
/// codebase; it surfaces as an internal error, never as caller input error.
pub(crate) fn decode_rows<T: DeserializeOwned>(rows: Value, what: &str) -> Result<Vec<T>> {
    serde_json::from_value(rows)
        .map_err(|e| AppError::Internal(format!("unexpected {what} row shape: {e}")))
}

/// Decode a single procedure result.
pub(crate) fn decode_value<T: DeserializeOwned>(value: Value, what: &str) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| AppError::Internal(format!("unexpected {what} shape: {e}")))
}

// =============================================================================
// HTTP surface
// =============================================================================

/// Introspection row for `GET /rpc`.
#[derive(Debug, Serialize)]
struct OperationInfo {
    name: &'static str,
    mode: OpMode,
    tier: AuthTier,
}

/// Create the RPC routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rpc", get(list_operations))
        .route("/rpc/{name}", post(call_operation))
}

/// List every registered operation with its declared mode and tier.
async fn list_operations(State(state): State<AppState>) -> Json<Vec<OperationInfo>> {
    let ops = state
        .registry()
        .operations()
        .map(|op| OperationInfo {
            name: op.name,
            mode: op.mode,
            tier: op.tier,
        })
        .collect();
    Json(ops)
}

/// Invoke one operation by name with a JSON input payload.
async fn call_operation(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(name): Path<String>,
    body: Option<Json<Value>>,
) -> Result<Json<Value>> {
    let input = body.map_or(Value::Null, |Json(value)| value);
    let ctx = OpContext {
        gateway: state.gateway(),
        user,
    };

    let result = state.registry().dispatch(&name, ctx, input).await?;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_all_operations() {
        let registry = Registry::new();
        assert_eq!(registry.len(), 25);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_registry_names_are_unique() {
        let registry = Registry::new();
        let mut seen = std::collections::HashSet::new();
        for op in registry.operations() {
            assert!(seen.insert(op.name), "duplicate operation: {}", op.name);
        }
    }

    #[test]
    fn test_registry_lookup() {
        let registry = Registry::new();
        let op = registry.get("products.getById").expect("operation exists");
        assert_eq!(op.mode, OpMode::Query);
        assert_eq!(op.tier, AuthTier::Public);

        assert!(registry.get("products.getByld").is_none());
    }

    #[test]
    fn test_ack_serializes_success() {
        let json = serde_json::to_value(Ack::OK).expect("serializable");
        assert_eq!(json, serde_json::json!({"success": true}));
    }
}
