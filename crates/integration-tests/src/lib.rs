//! Shared fixtures for dispatcher integration tests.
//!
//! Tests drive the real [`Registry`] against a scripted
//! [`MockGateway`], asserting on both the dispatch result and the exact
//! sequence of gateway calls performed.

use std::sync::Arc;

use harvestly_core::UserId;
use harvestly_server::gateway::mock::MockGateway;
use harvestly_server::gateway::{AuthUser, Gateway};
use harvestly_server::rpc::{OpContext, Registry};

/// A resolved identity for protected-operation tests.
#[must_use]
pub fn farmer() -> AuthUser {
    AuthUser {
        id: UserId::new(uuid::Uuid::new_v4()),
        email: Some("farmer@example.test".to_string()),
    }
}

/// Build an operation context over a scripted gateway.
#[must_use]
pub fn ctx(gateway: &Arc<MockGateway>, user: Option<AuthUser>) -> OpContext {
    OpContext {
        gateway: Arc::clone(gateway) as Arc<dyn Gateway>,
        user,
    }
}

/// A registry plus a fresh scripted gateway.
#[must_use]
pub fn harness() -> (Registry, Arc<MockGateway>) {
    (Registry::new(), Arc::new(MockGateway::new()))
}
