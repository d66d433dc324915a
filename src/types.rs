//! Domain types shared by the cache, the normalizer and the tools.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cluster health of an index as reported by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexHealth {
    Green,
    Yellow,
    Red,
    /// Anything the catalog reports that is not one of the above
    /// (closed indices on some versions report no health at all).
    #[serde(other)]
    Unknown,
}

impl fmt::Display for IndexHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Green => f.pad("green"),
            Self::Yellow => f.pad("yellow"),
            Self::Red => f.pad("red"),
            Self::Unknown => f.pad("unknown"),
        }
    }
}

/// Open/closed state of an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexStatus {
    Open,
    Close,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for IndexStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.pad("open"),
            Self::Close => f.pad("close"),
            Self::Unknown => f.pad("unknown"),
        }
    }
}

/// Projection of one catalog entry. Only these four fields survive;
/// everything else the catalog reports is discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSummary {
    pub index: String,
    pub health: IndexHealth,
    pub status: IndexStatus,
    pub docs_count: Option<u64>,
}

/// Ordered text fragments returned by every tool.
///
/// This is the transport-independent form of a tool result; the MCP
/// server maps each fragment onto one text content item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ToolOutput {
    fragments: Vec<String>,
}

impl ToolOutput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fragment, keeping insertion order.
    pub fn push(&mut self, text: impl Into<String>) {
        self.fragments.push(text.into());
    }

    #[must_use]
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    #[must_use]
    pub fn into_fragments(self) -> Vec<String> {
        self.fragments
    }
}

impl From<Vec<String>> for ToolOutput {
    fn from(fragments: Vec<String>) -> Self {
        Self { fragments }
    }
}

// Compile-time assertions for thread safety.
#[cfg(test)]
const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}

    assert_send_sync::<IndexSummary>();
    assert_send_sync::<ToolOutput>();
};
