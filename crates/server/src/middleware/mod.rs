//! HTTP middleware stack for the RPC server.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, trace transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Identity resolution (bearer token -> caller identity via the gateway)

pub mod auth;
pub mod request_id;

pub use auth::{CurrentUser, OptionalUser, resolve_identity};
pub use request_id::request_id_middleware;
