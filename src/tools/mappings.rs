//! Index mapping tool.

use super::validate_index;
use crate::backend::Backend;
use crate::error::Result;
use crate::types::ToolOutput;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Input for the get_mappings tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetMappingsInput {
    /// Name of the index to fetch mappings for
    #[serde(default)]
    pub index: String,
}

/// Executes the `get_mappings` tool.
///
/// Mappings are never cached. An index the backend reports without mapping
/// data renders as `{}`.
///
/// # Errors
///
/// Returns a validation error for a blank index name, or the backend error.
pub async fn execute_get_mappings(backend: &dyn Backend, input: GetMappingsInput) -> Result<ToolOutput> {
    let index = validate_index(&input.index)?;
    let response = backend.get_mapping(index).await?;

    let mappings = extract_mappings(&response, index);

    let mut out = ToolOutput::new();
    out.push(format!("Mappings for index: {index}"));
    out.push(serde_json::to_string_pretty(&mappings)?);
    Ok(out)
}

fn extract_mappings(response: &Map<String, Value>, index: &str) -> Value {
    response
        .get(index)
        .and_then(|entry| entry.get("mappings"))
        .filter(|m| !m.is_null())
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()))
}
