//! MCP tool implementations.
//!
//! Each tool is an async `execute_*` function that takes the backend (and
//! the index cache where relevant) plus its input, and returns a
//! [`ToolOutput`](crate::types::ToolOutput) or a [`ServerError`]. Turning
//! errors into tool-level error results is the server's job.

mod indices;
mod mappings;
mod search;

// indices
pub use indices::execute_list_indices;

// mappings
pub use mappings::{execute_get_mappings, GetMappingsInput};

// search
pub use search::{build_request_body, execute_search, parse_query_body, SearchInput};

use crate::error::{Result, ServerError};

/// Rejects blank index names, and the `.`/`..` names the engine forbids,
/// before anything reaches the backend.
pub(crate) fn validate_index(index: &str) -> Result<&str> {
    let trimmed = index.trim();
    if trimmed.is_empty() {
        return Err(ServerError::Validation(
            "index must be a non-empty string".to_string(),
        ));
    }
    if trimmed == "." || trimmed == ".." {
        return Err(ServerError::Validation(format!(
            "'{trimmed}' is not a valid index name"
        )));
    }
    Ok(trimmed)
}
