//! The back-end trait the session layer is written against.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::BackendError;

/// One page of a search result.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage {
    /// Total number of records matching the query.
    #[serde(rename = "totalRecords")]
    pub total_records: u64,

    /// The instance documents of this page, in result order.
    #[serde(default)]
    pub instances: Vec<Value>,
}

/// Authenticated access to the inventory back end.
///
/// [`crate::OkapiClient`] implements this over HTTP; gateway tests use an
/// in-memory fake.
#[async_trait]
pub trait InventoryBackend: Send + Sync {
    /// Authenticates and returns the opaque session token.
    async fn login(&self, username: &str, password: &str) -> Result<String, BackendError>;

    /// Runs a CQL search and returns the page at `offset` (0-based).
    async fn search(
        &self,
        token: Option<&str>,
        cql: &str,
        offset: u64,
        limit: u32,
    ) -> Result<SearchPage, BackendError>;
}
