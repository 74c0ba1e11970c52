//! HTTP implementation of the remote data gateway.
//!
//! Talks to the managed backend's REST surface:
//! - `POST {base}/rest/v1/rpc/{name}` for stored procedures
//! - `GET/POST/PATCH/DELETE {base}/rest/v1/{table}` for table reads/writes
//! - `GET {base}/auth/v1/user` for bearer-token identity resolution
//!
//! Uses the service-role key for data calls and the anonymous key plus the
//! caller's bearer token for identity resolution. No retries and no local
//! caching; each call maps to exactly one request.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::instrument;

use crate::config::GatewayConfig;

use super::{AuthUser, Gateway, GatewayError, TableQuery, TableWrite};

/// Maximum length of a gateway error body carried into logs.
const ERROR_BODY_SNIPPET: usize = 500;

/// Client for the remote data gateway.
#[derive(Clone)]
pub struct HttpGateway {
    inner: Arc<HttpGatewayInner>,
}

struct HttpGatewayInner {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
    service_key: String,
}

impl HttpGateway {
    /// Create a new gateway client.
    #[must_use]
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            inner: Arc::new(HttpGatewayInner {
                client: reqwest::Client::new(),
                base_url: config.url.clone(),
                anon_key: config.anon_key.clone(),
                service_key: config.service_key.expose_secret().to_string(),
            }),
        }
    }

    /// Attach the service-role auth headers used by data calls.
    fn with_service_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.inner.service_key)
            .header(
                "Authorization",
                format!("Bearer {}", self.inner.service_key),
            )
            .header("Content-Type", "application/json")
    }

    /// Send a request and decode the JSON body, surfacing non-success
    /// statuses as [`GatewayError::Status`].
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Value, GatewayError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(ERROR_BODY_SNIPPET).collect::<String>(),
                "Gateway returned non-success status"
            );
            return Err(GatewayError::Status {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        // Writes with no returned representation come back empty
        if body.is_empty() {
            return Ok(Value::Null);
        }

        let value: Value = serde_json::from_str(&body).inspect_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(ERROR_BODY_SNIPPET).collect::<String>(),
                "Failed to parse gateway response"
            );
        })?;

        Ok(value)
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.inner.base_url)
    }

    fn apply_filters(
        request: reqwest::RequestBuilder,
        filters: &[(String, String)],
    ) -> reqwest::RequestBuilder {
        let pairs: Vec<(&str, &str)> = filters
            .iter()
            .map(|(column, value)| (column.as_str(), value.as_str()))
            .collect();
        request.query(&pairs)
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    #[instrument(skip(self, params), fields(procedure = %name))]
    async fn call_procedure(&self, name: &str, params: Value) -> Result<Value, GatewayError> {
        let url = format!("{}/rest/v1/rpc/{name}", self.inner.base_url);
        let request = self.with_service_auth(self.inner.client.post(&url)).json(&params);
        self.execute(request).await
    }

    #[instrument(skip(self, query), fields(table = %table))]
    async fn query_table(&self, table: &str, query: TableQuery) -> Result<Value, GatewayError> {
        let mut request = self.with_service_auth(self.inner.client.get(self.table_url(table)));
        request = Self::apply_filters(request, &query.filters);

        if let Some(select) = &query.select {
            request = request.query(&[("select", select.as_str())]);
        }
        if let Some(order) = &query.order {
            request = request.query(&[("order", order.as_str())]);
        }
        if let Some(limit) = query.limit {
            request = request.query(&[("limit", limit)]);
        }
        if let Some(offset) = query.offset {
            request = request.query(&[("offset", offset)]);
        }

        self.execute(request).await
    }

    #[instrument(skip(self, write), fields(table = %table))]
    async fn write_table(&self, table: &str, write: TableWrite) -> Result<Value, GatewayError> {
        let url = self.table_url(table);

        let request = match write {
            TableWrite::Insert(payload) => self
                .with_service_auth(self.inner.client.post(&url))
                .header("Prefer", "return=representation")
                .json(&payload),
            TableWrite::Upsert {
                payload,
                on_conflict,
            } => self
                .with_service_auth(self.inner.client.post(&url))
                .header("Prefer", "resolution=merge-duplicates,return=representation")
                .query(&[("on_conflict", on_conflict.as_str())])
                .json(&payload),
            TableWrite::Update { payload, filters } => {
                let request = self
                    .with_service_auth(self.inner.client.patch(&url))
                    .header("Prefer", "return=representation")
                    .json(&payload);
                Self::apply_filters(request, &filters)
            }
            TableWrite::Delete { filters } => {
                let request = self.with_service_auth(self.inner.client.delete(&url));
                Self::apply_filters(request, &filters)
            }
        };

        self.execute(request).await
    }

    #[instrument(skip(self, bearer_token))]
    async fn auth_user(&self, bearer_token: &str) -> Result<AuthUser, GatewayError> {
        let url = format!("{}/auth/v1/user", self.inner.base_url);
        let response = self
            .inner
            .client
            .get(&url)
            .header("apikey", &self.inner.anon_key)
            .header("Authorization", format!("Bearer {bearer_token}"))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(GatewayError::AuthRejected);
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let user: AuthUser = serde_json::from_str(&body)?;
        Ok(user)
    }

    async fn ping(&self) -> Result<(), GatewayError> {
        let url = format!("{}/auth/v1/health", self.inner.base_url);
        let response = self
            .inner
            .client
            .get(&url)
            .header("apikey", &self.inner.anon_key)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(GatewayError::Status {
                status: response.status().as_u16(),
                message: "health probe failed".to_string(),
            })
        }
    }
}
