//! Index catalog tool.

use crate::backend::Backend;
use crate::cache::IndexCache;
use crate::error::Result;
use crate::types::ToolOutput;

/// Executes the `list_indices` tool.
///
/// Emits a count line (suffixed with ` (cached)` when the listing came from
/// the cache) followed by the full listing as pretty JSON.
///
/// # Errors
///
/// Returns the backend error if a refresh was needed and failed.
pub async fn execute_list_indices(cache: &IndexCache, backend: &dyn Backend) -> Result<ToolOutput> {
    let listing = cache.get_indices(backend).await?;

    let mut out = ToolOutput::new();
    out.push(format!(
        "Found {} indices{}",
        listing.indices.len(),
        if listing.was_cached { " (cached)" } else { "" }
    ));
    out.push(serde_json::to_string_pretty(listing.indices.as_slice())?);
    Ok(out)
}
