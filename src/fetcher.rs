use crate::config::Endpoints;
use crate::error::{AnalysisError, FetchError};
use log::{info, warn};
use reqwest::Url;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where a JSON document lives.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceLocation {
    Http(Url),
    File(PathBuf),
}

impl SourceLocation {
    /// Accepts `http(s)://` URLs, `file://` URLs and bare paths.
    pub fn parse(text: &str) -> Result<Self, String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err("source location is empty".to_string());
        }

        if !trimmed.contains("://") {
            return Ok(SourceLocation::File(PathBuf::from(trimmed)));
        }

        let url = Url::parse(trimmed).map_err(|e| format!("invalid URL '{}': {}", text, e))?;
        match url.scheme() {
            "http" | "https" => Ok(SourceLocation::Http(url)),
            "file" => url
                .to_file_path()
                .map(SourceLocation::File)
                .map_err(|_| format!("'{}' is not a local file URL", text)),
            other => Err(format!(
                "unsupported scheme '{}' in '{}' (expected http, https or file)",
                other, text
            )),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::Http(url) => write!(f, "{}", url),
            SourceLocation::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Anything that can produce a JSON document for a location string.
pub trait JsonSource {
    fn get_json(&self, location: &str) -> Result<Value, FetchError>;
}

/// Reads documents over HTTP with a blocking client, or from disk.
pub struct HttpJsonSource {
    client: reqwest::blocking::Client,
}

impl HttpJsonSource {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network {
                url: "<client>".to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }

    fn get_http(&self, url: &Url) -> Result<Value, FetchError> {
        let network = |e: reqwest::Error| FetchError::Network {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(url.clone()).send().map_err(network)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(network)?;
        parse_body(&url.to_string(), &body)
    }

    fn get_file(&self, path: &Path) -> Result<Value, FetchError> {
        let body = std::fs::read_to_string(path).map_err(|e| FetchError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        parse_body(&path.display().to_string(), &body)
    }
}

impl JsonSource for HttpJsonSource {
    fn get_json(&self, location: &str) -> Result<Value, FetchError> {
        let parsed = SourceLocation::parse(location).map_err(|message| FetchError::Network {
            url: location.to_string(),
            message,
        })?;
        match &parsed {
            SourceLocation::Http(url) => self.get_http(url),
            SourceLocation::File(path) => self.get_file(path),
        }
    }
}

fn parse_body(source_name: &str, body: &str) -> Result<Value, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::InvalidJson {
        source_name: source_name.to_string(),
        message: e.to_string(),
    })
}

/// Fetch one document. Failures are logged and reported as `None`, and so is
/// a JSON `null` body.
pub fn fetch_json(source: &dyn JsonSource, location: &str) -> Option<Value> {
    match source.get_json(location) {
        Ok(Value::Null) => {
            warn!("Error fetching data from {}: body is null", location);
            None
        }
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Error fetching data from {}: {}", location, e);
            None
        }
    }
}

/// The three raw documents of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSources {
    pub historical: Value,
    pub current: Value,
    /// Only checked for presence.
    pub metadata: Value,
}

/// Fetch all three documents in turn. If any is missing the whole run is
/// abandoned.
pub fn fetch_all(source: &dyn JsonSource, endpoints: &Endpoints) -> Result<QuizSources, AnalysisError> {
    let metadata = fetch_json(source, &endpoints.metadata);
    let current = fetch_json(source, &endpoints.current);
    let historical = fetch_json(source, &endpoints.historical);

    match (historical, current, metadata) {
        (Some(historical), Some(current), Some(metadata)) => {
            info!("Fetched historical, current and metadata documents");
            Ok(QuizSources {
                historical,
                current,
                metadata,
            })
        }
        (historical, current, metadata) => {
            let missing: Vec<&str> = [
                ("historical", historical.is_none()),
                ("current", current.is_none()),
                ("metadata", metadata.is_none()),
            ]
            .iter()
            .filter(|(_, absent)| *absent)
            .map(|(name, _)| *name)
            .collect();
            Err(AnalysisError::SourcesUnavailable(missing.join(", ")))
        }
    }
}
