//! Scripted in-memory gateway for tests.
//!
//! Lets tests queue per-target responses and assert on the exact sequence of
//! gateway calls an operation performed - in particular that validation and
//! authorization failures perform zero calls.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{AuthUser, Gateway, GatewayError, TableQuery, TableWrite};

enum Scripted {
    Ok(Value),
    Fail,
}

#[derive(Default)]
struct MockState {
    scripts: HashMap<String, VecDeque<Scripted>>,
    calls: Vec<String>,
    user: Option<AuthUser>,
}

/// A scripted [`Gateway`] implementation.
///
/// Targets are keyed as `procedure:{name}`, `query:{table}`, and
/// `write:{table}`. Unscripted queries return an empty row set; unscripted
/// procedures and writes return `null`. A scripted failure surfaces as a
/// `500`-status [`GatewayError`].
#[derive(Default)]
pub struct MockGateway {
    state: Mutex<MockState>,
}

impl MockGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identity returned by `auth_user` for any token.
    pub fn set_user(&self, user: AuthUser) {
        self.lock().user = Some(user);
    }

    /// Queue a successful procedure response.
    pub fn on_procedure(&self, name: &str, response: Value) {
        self.push(format!("procedure:{name}"), Scripted::Ok(response));
    }

    /// Queue a failing procedure response.
    pub fn fail_procedure(&self, name: &str) {
        self.push(format!("procedure:{name}"), Scripted::Fail);
    }

    /// Queue a successful table-read response (a JSON array of rows).
    pub fn on_query(&self, table: &str, rows: Value) {
        self.push(format!("query:{table}"), Scripted::Ok(rows));
    }

    /// Queue a failing table-read response.
    pub fn fail_query(&self, table: &str) {
        self.push(format!("query:{table}"), Scripted::Fail);
    }

    /// Queue a successful table-write response.
    pub fn on_write(&self, table: &str, response: Value) {
        self.push(format!("write:{table}"), Scripted::Ok(response));
    }

    /// Queue a failing table-write response.
    pub fn fail_write(&self, table: &str) {
        self.push(format!("write:{table}"), Scripted::Fail);
    }

    /// Number of data calls (procedures, reads, writes) performed so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    /// The ordered list of call targets performed so far.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn push(&self, target: String, scripted: Scripted) {
        self.lock().scripts.entry(target).or_default().push_back(scripted);
    }

    fn take(&self, target: &str, fallback: Value) -> Result<Value, GatewayError> {
        let mut state = self.lock();
        state.calls.push(target.to_string());

        match state.scripts.get_mut(target).and_then(VecDeque::pop_front) {
            Some(Scripted::Ok(value)) => Ok(value),
            Some(Scripted::Fail) => Err(GatewayError::Status {
                status: 500,
                message: "scripted gateway failure".to_string(),
            }),
            None => Ok(fallback),
        }
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn call_procedure(&self, name: &str, _params: Value) -> Result<Value, GatewayError> {
        self.take(&format!("procedure:{name}"), Value::Null)
    }

    async fn query_table(&self, table: &str, _query: TableQuery) -> Result<Value, GatewayError> {
        self.take(&format!("query:{table}"), Value::Array(Vec::new()))
    }

    async fn write_table(&self, table: &str, _write: TableWrite) -> Result<Value, GatewayError> {
        self.take(&format!("write:{table}"), Value::Null)
    }

    async fn auth_user(&self, _bearer_token: &str) -> Result<AuthUser, GatewayError> {
        self.lock().user.clone().ok_or(GatewayError::AuthRejected)
    }

    async fn ping(&self) -> Result<(), GatewayError> {
        Ok(())
    }
}
