//! Connection configuration.
//!
//! Values come from CLI flags with environment-variable fallbacks and are
//! validated once, before any backend client is built.

use crate::error::ConfigError;
use clap::Args;
use reqwest::Url;
use std::fmt;
use std::path::PathBuf;

/// Connection flags shared by the MCP server and the CLI subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Elasticsearch base URL, e.g. https://localhost:9200
    #[arg(long, env = "ES_URL", global = true)]
    pub url: Option<String>,

    /// API key (takes precedence over username/password)
    #[arg(long, env = "ES_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Username for basic authentication
    #[arg(long, env = "ES_USERNAME", global = true)]
    pub username: Option<String>,

    /// Password for basic authentication
    #[arg(long, env = "ES_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// PEM file with an extra CA certificate to trust
    #[arg(long, env = "ES_CA_CERT", global = true)]
    pub ca_cert: Option<PathBuf>,
}

/// How requests authenticate against the backend.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    ApiKey(String),
    Basic { username: String, password: String },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

/// Validated connection settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub url: Url,
    pub credentials: Credentials,
    /// PEM bytes of the extra trusted CA, if one was configured.
    pub ca_cert_pem: Option<Vec<u8>>,
}

impl Config {
    /// Validates raw connection arguments.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the URL is missing or malformed, no usable
    /// credential combination is present, or the CA file cannot be read.
    pub fn from_args(args: ConnectionArgs) -> Result<Self, ConfigError> {
        let url = parse_url(args.url.as_deref())?;
        let credentials = resolve_credentials(args.api_key, args.username, args.password)?;
        let ca_cert_pem = args.ca_cert.map(read_ca_cert).transpose()?;

        Ok(Self {
            url,
            credentials,
            ca_cert_pem,
        })
    }
}

fn parse_url(raw: Option<&str>) -> Result<Url, ConfigError> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty());
    let Some(raw) = raw else {
        return Err(ConfigError::MissingUrl);
    };

    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{other}', expected http or https"),
        }),
    }
}

fn resolve_credentials(
    api_key: Option<String>,
    username: Option<String>,
    password: Option<String>,
) -> Result<Credentials, ConfigError> {
    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

    if let Some(key) = non_empty(api_key) {
        return Ok(Credentials::ApiKey(key));
    }

    match (non_empty(username), non_empty(password)) {
        (Some(username), Some(password)) => Ok(Credentials::Basic { username, password }),
        (None, None) => Err(ConfigError::MissingCredentials),
        _ => Err(ConfigError::IncompleteBasicAuth),
    }
}

fn read_ca_cert(path: PathBuf) -> Result<Vec<u8>, ConfigError> {
    let pem = std::fs::read(&path).map_err(|source| ConfigError::CaCertRead {
        path: path.clone(),
        source,
    })?;

    let text = String::from_utf8_lossy(&pem);
    if !text.contains("-----BEGIN CERTIFICATE-----") {
        return Err(ConfigError::CaCertInvalid {
            path,
            reason: "no PEM certificate block found".to_string(),
        });
    }

    Ok(pem)
}
