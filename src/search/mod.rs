// src/search/mod.rs
//
// Boundary to the remote document-search service. `SearchService` is one
// page per call; `BoundedFetcher` is the contract the finder relies on and
// returns every hub inside a bounding box.

pub mod cloudant;
pub mod paginate;
pub mod query;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::HubFinderError;
use crate::models::{BoundingBox, Hub, Point};
use crate::utils::cancel::CancellationSignal;

pub use cloudant::CloudantClient;
pub use paginate::PaginatedFetcher;
pub use query::{build_query, QueryExpression};

/// Body of a single search request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bookmark: Option<String>,
}

/// One page of search results plus the bookmark for the next page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub total_rows: Option<u64>,
    #[serde(default)]
    pub bookmark: Option<String>,
    #[serde(default)]
    pub rows: Vec<SearchRow>,
}

/// A raw search hit. Every field is optional because the index can hold
/// incomplete documents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRow {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub fields: Option<Map<String, Value>>,
}

impl SearchRow {
    /// Converts the row into a hub, or `None` when the id, `lat`, `lon` or
    /// `name` field is missing or has the wrong type.
    pub fn to_hub(&self) -> Option<Hub> {
        let id = self.id.as_deref().filter(|id| !id.is_empty())?;
        let fields = self.fields.as_ref()?;
        let lat = fields.get("lat")?.as_f64()?;
        let lon = fields.get("lon")?.as_f64()?;
        let name = fields.get("name")?.as_str()?;
        Some(Hub::new(id, name, Point::new(lat, lon)))
    }
}

/// Failure of a single search round-trip.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search request failed")]
    Transport(#[source] reqwest::Error),

    #[error("search service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

impl SearchError {
    /// Timeouts, connection failures, HTTP 429 and 5xx are worth another try.
    pub fn is_retryable(&self) -> bool {
        match self {
            SearchError::Transport(e) => e.is_timeout() || e.is_connect(),
            SearchError::Status { status, .. } => *status == 429 || (500..600).contains(status),
        }
    }
}

/// Issues exactly one network round-trip per call.
#[async_trait]
pub trait SearchService: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<SearchPage, SearchError>;
}

/// Returns all hubs whose location falls inside `bounds`.
///
/// Implementations exhaust pagination themselves, skip malformed records,
/// check `cancel` before every round-trip and never return partial results
/// alongside an error.
#[async_trait]
pub trait BoundedFetcher: Send + Sync {
    async fn fetch_by_bounds(
        &self,
        bounds: &BoundingBox,
        cancel: &CancellationSignal,
    ) -> Result<Vec<Hub>, HubFinderError>;
}
