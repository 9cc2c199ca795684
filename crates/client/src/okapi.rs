//! The `reqwest` implementation of [`InventoryBackend`].
//!
//! Every request carries `X-Okapi-tenant`, `Content-Type: application/json`
//! and `Accept: application/json`; `X-Okapi-token` is added exactly when a
//! token is held. Request logging never includes the token or a password.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderName, ACCEPT, CONTENT_TYPE};
use serde_json::json;
use tracing::debug;

use crate::config::Config;
use crate::core::{InventoryBackend, SearchPage};
use crate::error::{decode_error_body, BackendError};

/// Header naming the tenant on every Okapi request.
pub static X_OKAPI_TENANT: HeaderName = HeaderName::from_static("x-okapi-tenant");

/// Header carrying the session token.
pub static X_OKAPI_TOKEN: HeaderName = HeaderName::from_static("x-okapi-token");

/// Authenticated HTTP client for one Okapi back end.
#[derive(Debug, Clone)]
pub struct OkapiClient {
    http: reqwest::Client,
    base_url: String,
    query_base_url: String,
    tenant: String,
}

impl OkapiClient {
    /// Creates a client for the back end named by the configuration.
    pub fn new(config: &Config) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()?;
        Ok(Self {
            http,
            base_url: config.okapi.url.trim_end_matches('/').to_string(),
            query_base_url: config.query_base_url().trim_end_matches('/').to_string(),
            tenant: config.okapi.tenant.clone(),
        })
    }

    /// The tenant this client addresses.
    pub fn tenant(&self) -> &str {
        &self.tenant
    }
}

#[async_trait]
impl InventoryBackend for OkapiClient {
    async fn login(&self, username: &str, password: &str) -> Result<String, BackendError> {
        let url = format!("{}/bl-users/login", self.base_url);
        debug!(url = %url, tenant = %self.tenant, username = %username, "logging in");

        let response = self
            .http
            .post(&url)
            .header(&X_OKAPI_TENANT, self.tenant.as_str())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&json!({"username": username, "password": password}))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Http {
                status: status.as_u16(),
                message: decode_error_body(&body),
            });
        }

        let token = response
            .headers()
            .get(&X_OKAPI_TOKEN)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or(BackendError::MissingToken)?;
        debug!(tenant = %self.tenant, "login succeeded");
        Ok(token)
    }

    async fn search(
        &self,
        token: Option<&str>,
        cql: &str,
        offset: u64,
        limit: u32,
    ) -> Result<SearchPage, BackendError> {
        let url = format!("{}/inventory/instances", self.query_base_url);
        debug!(url = %url, cql = %cql, offset, limit, "searching inventory");

        let mut request = self
            .http
            .get(&url)
            .query(&[
                ("offset", offset.to_string()),
                ("limit", limit.to_string()),
                ("query", cql.to_string()),
            ])
            .header(&X_OKAPI_TENANT, self.tenant.as_str())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");
        if let Some(token) = token {
            request = request.header(&X_OKAPI_TOKEN, token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Http {
                status: status.as_u16(),
                message: decode_error_body(&body),
            });
        }

        let body = response.text().await?;
        let page: SearchPage = serde_json::from_str(&body)?;
        debug!(total = page.total_records, returned = page.instances.len(), "search page received");
        Ok(page)
    }
}
