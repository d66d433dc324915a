//! Search tool.

use super::validate_index;
use crate::backend::Backend;
use crate::error::{Result, ServerError};
use crate::normalize::normalize;
use crate::types::ToolOutput;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// Input for the search tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchInput {
    /// Name of the index to search
    #[serde(default)]
    pub index: String,
    /// Complete Elasticsearch Query DSL body (query, size, from, sort, aggs, ...)
    #[serde(rename = "queryBody", default)]
    #[schemars(with = "Map<String, Value>")]
    pub query_body: Value,
}

/// Executes the `search` tool.
///
/// # Errors
///
/// Returns a validation error for a blank index or a query body that is not
/// a JSON object, or the backend error.
pub async fn execute_search(backend: &dyn Backend, input: SearchInput) -> Result<ToolOutput> {
    let index = validate_index(&input.index)?;
    let query = parse_query_body(input.query_body)?;

    let from = requested_offset(&query);
    let body = build_request_body(query);

    let response = backend.search(index, &body).await?;
    Ok(normalize(&response, from))
}

/// Offset the caller asked for. The engine also takes `from` as a numeric
/// string; anything it would not take as a non-negative integer counts as 0.
fn requested_offset(query: &Map<String, Value>) -> u64 {
    match query.get("from") {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Accepts the query body as a JSON object, or as a string holding one.
///
/// # Errors
///
/// Returns [`ServerError::Validation`] for anything else.
pub fn parse_query_body(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(not_an_object(&other)),
            Err(e) => Err(ServerError::Validation(format!(
                "queryBody is not valid JSON: {e}"
            ))),
        },
        Value::Null => Err(ServerError::Validation(
            "queryBody is required".to_string(),
        )),
        other => Err(not_an_object(&other)),
    }
}

fn not_an_object(value: &Value) -> ServerError {
    let kind = match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    };
    ServerError::Validation(format!("queryBody must be a JSON object, got {kind}"))
}

/// Builds the request body sent to the backend.
///
/// Starts from a highlight-everything envelope and lays the caller's fields
/// over it, so caller keys win. An `index` key in the caller's body is
/// dropped: the index always comes from the explicit tool argument.
#[must_use]
pub fn build_request_body(query: Map<String, Value>) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert("highlight".to_string(), json!({ "fields": { "*": {} } }));

    for (key, value) in query {
        if key == "index" {
            tracing::debug!("ignoring 'index' inside queryBody");
            continue;
        }
        body.insert(key, value);
    }
    body
}
