//! HTTP implementation of [`Backend`] on top of `reqwest`.

use super::{Backend, CatIndex, SearchResponse};
use crate::config::{Config, Credentials};
use crate::error::{BackendError, BackendResult, ConfigError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Certificate, Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Columns requested from the catalog; the rest are never projected.
const CAT_COLUMNS: &str = "index,health,status,docs.count";

/// Elasticsearch client speaking the REST API directly.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base: Url,
    credentials: Credentials,
}

impl HttpBackend {
    /// Builds the client from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Client`] if the TLS setup is rejected.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));

        if let Some(pem) = &config.ca_cert_pem {
            let cert = Certificate::from_pem(pem).map_err(|e| ConfigError::Client(e.to_string()))?;
            builder = builder.add_root_certificate(cert);
        }

        if let Credentials::ApiKey(key) = &config.credentials {
            let mut value = HeaderValue::from_str(&format!("ApiKey {key}"))
                .map_err(|e| ConfigError::Client(format!("invalid API key: {e}")))?;
            value.set_sensitive(true);
            let mut headers = HeaderMap::new();
            headers.insert(AUTHORIZATION, value);
            builder = builder.default_headers(headers);
        }

        let client = builder
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base: config.url.clone(),
            credentials: config.credentials.clone(),
        })
    }

    /// Returns the base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    ///
    /// `.` and `..` are refused: the URL parser would drop them and the
    /// request would silently target the cluster root.
    fn endpoint(&self, segments: &[&str]) -> BackendResult<Url> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "." | "..")) {
            return Err(BackendError::Transport(format!(
                "refusing to build a request path with segment '{bad}'"
            )));
        }
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| BackendError::Transport(format!("cannot use {} as a base URL", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            // API keys travel in the default headers.
            Credentials::ApiKey(_) => request,
            Credentials::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> BackendResult<T> {
        let response = self.authorize(request).send().await?;
        let response = check_status(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| BackendError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn cat_indices(&self) -> BackendResult<Vec<CatIndex>> {
        let mut url = self.endpoint(&["_cat", "indices"])?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("h", CAT_COLUMNS);

        tracing::debug!(%url, "listing indices");
        self.send(self.client.get(url)).await
    }

    async fn get_mapping(&self, index: &str) -> BackendResult<Map<String, Value>> {
        let url = self.endpoint(&[index, "_mapping"])?;
        tracing::debug!(%url, "fetching mapping");
        self.send(self.client.get(url)).await
    }

    async fn search(&self, index: &str, body: &Map<String, Value>) -> BackendResult<SearchResponse> {
        let url = self.endpoint(&[index, "_search"])?;
        tracing::debug!(%url, "running search");
        self.send(self.client.post(url).json(body)).await
    }
}

/// Turns a non-success response into a [`BackendError::Status`], pulling
/// `error.type: error.reason` out of the body when the backend sent one.
async fn check_status(response: Response) -> BackendResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(BackendError::Status {
        status: status.as_u16(),
        message: error_message(&body, status.canonical_reason()),
    })
}

fn error_message(body: &str, fallback: Option<&str>) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let error = parsed.as_ref().and_then(|v| v.get("error"));

    match error {
        Some(Value::Object(obj)) => {
            let kind = obj.get("type").and_then(Value::as_str);
            let reason = obj.get("reason").and_then(Value::as_str);
            match (kind, reason) {
                (Some(kind), Some(reason)) => format!("{kind}: {reason}"),
                (None, Some(reason)) => reason.to_string(),
                (Some(kind), None) => kind.to_string(),
                (None, None) => body.trim().to_string(),
            }
        }
        Some(Value::String(s)) => s.clone(),
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => fallback.unwrap_or("request failed").to_string(),
    }
}
