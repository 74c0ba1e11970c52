//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side failures to
//! Sentry before responding to the caller with a structured
//! `{code, message}` body. All operation handlers return
//! `Result<T, AppError>`.
//!
//! Gateway failures never leak the gateway's own error text to the caller:
//! the surfaced message is the operation-specific generic one attached at
//! the point of the gateway call.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::gateway::GatewayError;

/// Application-level error type for the RPC server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input failed its declared shape constraints.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A protected operation was invoked without a resolved identity.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource or operation not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A gateway call failed; `message` is the operation's generic message.
    #[error("{message}")]
    Gateway {
        message: String,
        #[source]
        source: GatewayError,
    },

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Wrap a gateway failure with an operation-specific generic message.
    pub fn gateway(message: impl Into<String>, source: GatewayError) -> Self {
        Self::Gateway {
            message: message.into(),
            source,
        }
    }

    /// Stable machine-readable error code surfaced to callers.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "BAD_REQUEST",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Gateway { .. } => "GATEWAY_ERROR",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Validation(format!("invalid input: {err}"))
    }
}

/// Structured error body returned to callers.
#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server-side failures to Sentry
        if matches!(self, Self::Gateway { .. } | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Operation error"
            );
        }

        let status = match &self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Gateway { .. } => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients; the Gateway
        // message is the operation's own generic text, never gateway output.
        let message = match &self {
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Gateway { message, .. } => message.clone(),
            _ => self.to_string(),
        };

        let body = ErrorBody {
            code: self.code(),
            message,
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a resolved caller identity.
///
/// Call this after identity resolution to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("products.getById".to_string());
        assert_eq!(err.to_string(), "Not found: products.getById");

        let err = AppError::Validation("productId must not be empty".to_string());
        assert_eq!(
            err.to_string(),
            "Validation error: productId must not be empty"
        );
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            status_of(AppError::Validation("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::gateway(
                "failed to load product",
                GatewayError::Status {
                    status: 500,
                    message: "boom".to_string()
                }
            )),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_gateway_error_surfaces_generic_message_only() {
        let err = AppError::gateway(
            "failed to load product",
            GatewayError::Status {
                status: 500,
                message: "pgrst: relation \"products\" does not exist".to_string(),
            },
        );

        // The Display form (what reaches the caller) is the generic message
        assert_eq!(err.to_string(), "failed to load product");
        assert_eq!(err.code(), "GATEWAY_ERROR");
    }
}
