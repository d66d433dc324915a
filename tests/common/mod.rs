//! Common test utilities for elastic-mcp integration tests.
//!
//! Provides `FakeBackend`, an in-memory stand-in for the search engine that
//! counts calls and can be switched into failure mode, plus helpers for
//! building servers on a manual clock and capturing log output.

#![allow(dead_code)] // Test utilities may not all be used in every test file

use async_trait::async_trait;
use elastic_mcp::backend::{Backend, CatIndex, SearchResponse};
use elastic_mcp::cache::{IndexCache, ManualClock};
use elastic_mcp::error::{BackendError, BackendResult};
use elastic_mcp::server::ElasticMcpServer;
use rmcp::model::CallToolResult;
use serde_json::{json, Map, Value};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// In-memory backend with call counters.
pub struct FakeBackend {
    indices: Mutex<Vec<Value>>,
    mappings: Mutex<Map<String, Value>>,
    search_response: Mutex<Value>,
    failure: Mutex<Option<BackendError>>,
    last_search: Mutex<Option<(String, Map<String, Value>)>>,
    pub cat_calls: AtomicUsize,
    pub mapping_calls: AtomicUsize,
    pub search_calls: AtomicUsize,
}

impl FakeBackend {
    /// A backend with two indices, one mapping and a two-hit search result.
    pub fn new() -> Self {
        Self {
            indices: Mutex::new(vec![
                json!({
                    "index": "products",
                    "health": "green",
                    "status": "open",
                    "docs.count": "1200",
                    "store.size": "3mb"
                }),
                json!({
                    "index": "logs-2024",
                    "health": "yellow",
                    "status": "open",
                    "docs.count": "98"
                }),
            ]),
            mappings: Mutex::new(as_map(json!({
                "products": {
                    "mappings": {
                        "properties": {
                            "name": {"type": "text"},
                            "price": {"type": "float"}
                        }
                    }
                }
            }))),
            search_response: Mutex::new(json!({
                "took": 2,
                "hits": {
                    "total": {"value": 57, "relation": "eq"},
                    "hits": [
                        {"_index": "products", "_id": "1", "_score": 1.2, "_source": {"name": "desk lamp", "price": 19.5}},
                        {"_index": "products", "_id": "2", "_score": 0.8, "_source": {"name": "floor lamp", "price": 49.0}}
                    ]
                }
            })),
            failure: Mutex::new(None),
            last_search: Mutex::new(None),
            cat_calls: AtomicUsize::new(0),
            mapping_calls: AtomicUsize::new(0),
            search_calls: AtomicUsize::new(0),
        }
    }

    /// Makes every subsequent call fail with `err` (or succeed again with `None`).
    pub fn fail_with(&self, err: Option<BackendError>) {
        *self.failure.lock().unwrap() = err;
    }

    pub fn set_indices(&self, indices: Vec<Value>) {
        *self.indices.lock().unwrap() = indices;
    }

    pub fn set_mappings(&self, mappings: Value) {
        *self.mappings.lock().unwrap() = as_map(mappings);
    }

    pub fn set_search_response(&self, response: Value) {
        *self.search_response.lock().unwrap() = response;
    }

    /// Index and body of the most recent search call.
    pub fn last_search(&self) -> Option<(String, Map<String, Value>)> {
        self.last_search.lock().unwrap().clone()
    }

    pub fn cat_calls(&self) -> usize {
        self.cat_calls.load(Ordering::SeqCst)
    }

    pub fn mapping_calls(&self) -> usize {
        self.mapping_calls.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> BackendResult<()> {
        match self.failure.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn cat_indices(&self) -> BackendResult<Vec<CatIndex>> {
        self.cat_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        let raw = Value::Array(self.indices.lock().unwrap().clone());
        serde_json::from_value(raw).map_err(|e| BackendError::Decode(e.to_string()))
    }

    async fn get_mapping(&self, index: &str) -> BackendResult<Map<String, Value>> {
        self.mapping_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        let mappings = self.mappings.lock().unwrap();
        match mappings.get(index) {
            Some(entry) => {
                let mut response = Map::new();
                response.insert(index.to_string(), entry.clone());
                Ok(response)
            }
            None => Err(BackendError::Status {
                status: 404,
                message: format!("index_not_found_exception: no such index [{index}]"),
            }),
        }
    }

    async fn search(&self, index: &str, body: &Map<String, Value>) -> BackendResult<SearchResponse> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_search.lock().unwrap() = Some((index.to_string(), body.clone()));
        self.check_failure()?;
        let raw = self.search_response.lock().unwrap().clone();
        serde_json::from_value(raw).map_err(|e| BackendError::Decode(e.to_string()))
    }
}

/// A server over `backend` whose cache reads time from `clock`.
pub fn server_with_clock(backend: &Arc<FakeBackend>, clock: &Arc<ManualClock>) -> ElasticMcpServer {
    let cache = IndexCache::with_clock(clock.clone());
    ElasticMcpServer::with_cache(backend.clone(), cache)
}

/// A server plus its fake backend and manual clock.
pub fn test_server() -> (ElasticMcpServer, Arc<FakeBackend>, Arc<ManualClock>) {
    let backend = Arc::new(FakeBackend::new());
    let clock = Arc::new(ManualClock::new());
    let server = server_with_clock(&backend, &clock);
    (server, backend, clock)
}

/// Text of every content item, in order.
pub fn texts(result: &CallToolResult) -> Vec<String> {
    result
        .content
        .iter()
        .map(|c| c.as_text().expect("text content").text.clone())
        .collect()
}

pub fn is_error(result: &CallToolResult) -> bool {
    result.is_error == Some(true)
}

pub fn as_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected JSON object, got {other}"),
    }
}

/// Shared in-memory log sink for asserting on emitted log events.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Number of log lines emitted at `level` (e.g. "ERROR").
    pub fn count(&self, level: &str) -> usize {
        let needle = format!(" {level} ");
        self.contents()
            .lines()
            .filter(|line| line.contains(&needle))
            .count()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Routes log events on the current thread into a [`LogCapture`] until the
/// returned guard is dropped. Use with the default current-thread
/// `#[tokio::test]` runtime so every poll happens on this thread.
pub fn capture_logs() -> (LogCapture, tracing::subscriber::DefaultGuard) {
    let capture = LogCapture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(capture.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (capture, guard)
}
