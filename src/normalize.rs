//! Search response normalization.
//!
//! Turns a raw search response into the fragment list every search tool
//! call returns: one metadata line followed by one pretty-printed source
//! document per hit, in backend order.

use crate::backend::SearchResponse;
use crate::types::ToolOutput;
use serde_json::Value;

/// Normalizes `raw` into tool output. `from` is the pagination offset the
/// caller asked for and is echoed back in the metadata line.
#[must_use]
pub fn normalize(raw: &SearchResponse, from: u64) -> ToolOutput {
    let hits = &raw.hits.hits;
    let total = raw.hits.total.as_ref().map_or(0, |t| t.value());

    let mut out = ToolOutput::new();
    out.push(format!(
        "Total results: {total}, showing {} from position {from}",
        hits.len()
    ));

    for hit in hits {
        out.push(render_source(hit.source.as_ref()));
    }

    out
}

/// Pretty JSON with 2-space indent; a hit without a source renders as `{}`.
fn render_source(source: Option<&Value>) -> String {
    match source {
        Some(doc) => serde_json::to_string_pretty(doc).unwrap_or_else(|_| doc.to_string()),
        None => "{}".to_string(),
    }
}
