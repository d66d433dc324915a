//! elastic-mcp: MCP server exposing Elasticsearch as three tools.
//!
//! - `list_indices`: catalog listing, cached for ten minutes
//! - `get_mappings`: field mappings for one index
//! - `search`: Query DSL search with normalized output
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              MCP Server (rmcp)              │
//! │         JSON-RPC over stdin/stdout          │
//! └─────────────────┬───────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────┐
//! │               Tool Router                    │
//! │   list_indices, get_mappings, search        │
//! │   (errors -> "Error: ..." tool results)     │
//! └───────┬─────────────────┬───────────────────┘
//!         │                 │
//!    ┌────▼──────┐    ┌─────▼──────┐
//!    │IndexCache │    │ Normalizer │
//!    │ 10 min TTL│    │ hits/total │
//!    └────┬──────┘    └─────▲──────┘
//!         │                 │
//!    ┌────▼─────────────────┴──────┐
//!    │      Backend (reqwest)       │
//!    │ _cat/indices _mapping _search│
//!    └──────────────────────────────┘
//! ```

pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod fmt;
pub mod normalize;
pub mod server;
pub mod tools;
pub mod types;

pub use error::{BackendError, ConfigError, Result, ServerError};
pub use types::{IndexHealth, IndexStatus, IndexSummary, ToolOutput};
