//! Backend client adapter.
//!
//! The [`Backend`] trait is the seam between the tools and the search
//! engine: the production implementation speaks HTTP ([`HttpBackend`]),
//! tests plug in an in-memory fake.

pub mod http;

pub use http::HttpBackend;

use crate::error::BackendResult;
use crate::types::{IndexHealth, IndexStatus, IndexSummary};
use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Operations the tools need from the document store.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Lists every index in the catalog.
    async fn cat_indices(&self) -> BackendResult<Vec<CatIndex>>;

    /// Fetches mapping definitions, keyed by index name.
    async fn get_mapping(&self, index: &str) -> BackendResult<Map<String, Value>>;

    /// Runs a search. `body` is the complete request body.
    async fn search(&self, index: &str, body: &Map<String, Value>) -> BackendResult<SearchResponse>;
}

/// One raw catalog row.
///
/// The catalog reports more columns than these; unknown ones are ignored
/// during deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatIndex {
    pub index: String,
    #[serde(default)]
    pub health: Option<IndexHealth>,
    #[serde(default)]
    pub status: Option<IndexStatus>,
    #[serde(rename = "docs.count", default, deserialize_with = "lenient_count")]
    pub docs_count: Option<u64>,
}

impl From<CatIndex> for IndexSummary {
    fn from(raw: CatIndex) -> Self {
        Self {
            index: raw.index,
            health: raw.health.unwrap_or(IndexHealth::Unknown),
            status: raw.status.unwrap_or(IndexStatus::Unknown),
            docs_count: raw.docs_count,
        }
    }
}

/// Accepts a count encoded as a number, a decimal string, or null.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Raw search response, reduced to what the normalizer reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub hits: HitsEnvelope,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HitsEnvelope {
    #[serde(default)]
    pub total: Option<TotalHits>,
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// Total-hit count. Older engines send a bare integer, newer ones an
/// object with a `value` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TotalHits {
    Count(u64),
    Object {
        #[serde(default)]
        value: Option<u64>,
    },
    Other(Value),
}

impl TotalHits {
    #[must_use]
    pub fn value(&self) -> u64 {
        match self {
            Self::Count(n) => *n,
            Self::Object { value } => value.unwrap_or(0),
            Self::Other(_) => 0,
        }
    }
}

/// A single search hit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Hit {
    #[serde(rename = "_source", default)]
    pub source: Option<Value>,
}
