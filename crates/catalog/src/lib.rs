//! Catalog and profile loading.
//!
//! Provides the `CatalogSource` trait with file and HTTP implementations.
//! This is the only place events and profiles come from outside the process;
//! the matching crates never perform I/O.

use std::future::Future;
use std::path::{Path, PathBuf};

use eventmatch_model::{Event, Profile};
use serde_json::Value;
use thiserror::Error;

/// Errors from catalog and profile loading.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Trait for event catalog sources (scraper output on disk, remote JSON).
pub trait CatalogSource {
    /// Load every event in the catalog, in catalog order.
    fn load_events(&self) -> impl Future<Output = Result<Vec<Event>, CatalogError>> + Send;

    /// Get the source name for logging.
    fn name(&self) -> &'static str;
}

/// Catalog stored as a JSON array on disk.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for FileCatalog {
    async fn load_events(&self) -> Result<Vec<Event>, CatalogError> {
        let text = read_file(&self.path).await?;
        let events = parse_events(&text)?;
        tracing::debug!(path = %self.path.display(), events = events.len(), "Loaded catalog file");
        Ok(events)
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

/// Remote catalog configuration.
#[derive(Debug, Clone)]
pub struct HttpCatalogConfig {
    /// URL serving the catalog JSON array
    pub url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for HttpCatalogConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:5173/all_luma_events.json".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Catalog fetched over HTTP.
pub struct HttpCatalog {
    config: HttpCatalogConfig,
    client: reqwest::Client,
}

impl HttpCatalog {
    pub fn new(config: HttpCatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl CatalogSource for HttpCatalog {
    async fn load_events(&self) -> Result<Vec<Event>, CatalogError> {
        tracing::debug!(url = %self.config.url, "Fetching catalog");

        let response = self.client.get(&self.config.url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status { status, body });
        }

        let text = response.text().await?;
        parse_events(&text)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Load one profile from a JSON file.
pub async fn load_profile(path: impl AsRef<Path>) -> Result<Profile, CatalogError> {
    let text = read_file(path.as_ref()).await?;
    serde_json::from_str(&text).map_err(|e| CatalogError::Parse(e.to_string()))
}

async fn read_file(path: &Path) -> Result<String, CatalogError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Parse a catalog JSON array.
///
/// Entries are read leniently: missing fields become empty, numbers are
/// accepted where strings are expected, and non-object entries are skipped.
pub fn parse_events(text: &str) -> Result<Vec<Event>, CatalogError> {
    let value: Value = serde_json::from_str(text).map_err(|e| CatalogError::Parse(e.to_string()))?;

    let entries = value
        .as_array()
        .ok_or_else(|| CatalogError::Parse("Catalog is not a JSON array".to_string()))?;

    let mut events = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        if !entry.is_object() {
            tracing::warn!(index = i, "Skipping non-object catalog entry");
            continue;
        }
        events.push(event_from_value(entry));
    }

    Ok(events)
}

fn event_from_value(source: &Value) -> Event {
    Event {
        title: string_field(source, "title").unwrap_or_default(),
        date: string_field(source, "date").unwrap_or_default(),
        location: string_field(source, "location").unwrap_or_default(),
        organizers: string_field(source, "organizers").unwrap_or_default(),
        status: string_field(source, "status").filter(|s| !s.is_empty()),
        attendees: string_field(source, "attendees").unwrap_or_default(),
        link: string_field(source, "link").unwrap_or_default(),
        description: string_field(source, "description").unwrap_or_default(),
        city: string_field(source, "city").filter(|s| !s.is_empty()),
    }
}

fn string_field(source: &Value, key: &str) -> Option<String> {
    match source.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
