//! Dataset sources.
//!
//! A source yields the raw dataset document; [`DatasetLoader`] parses it and
//! owns the currently published dataset. A failed load never replaces what
//! was published before, and nothing is retried.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use formats::{DataFormat, Dataset};
use tracing::{info, warn};

#[derive(Debug)]
pub struct FetchError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}: {source}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as _)
    }
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Where a dataset document comes from.
pub trait DatasetSource: Send + Sync {
    /// URL or path, for logs.
    fn location(&self) -> &str;

    fn fetch(&self) -> BoxFuture<'_, Result<String, FetchError>>;
}

pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }
}

impl DatasetSource for HttpSource {
    fn location(&self) -> &str {
        &self.url
    }

    fn fetch(&self) -> BoxFuture<'_, Result<String, FetchError>> {
        Box::pin(async move {
            let resp = self
                .client
                .get(&self.url)
                .send()
                .await
                .map_err(|e| FetchError::with_source("HTTP request failed", e))?;

            if !resp.status().is_success() {
                return Err(FetchError::new(format!("HTTP error: {}", resp.status())));
            }

            resp.text()
                .await
                .map_err(|e| FetchError::with_source("Failed to read response", e))
        })
    }
}

pub struct FileSource {
    path: PathBuf,
    location: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            location: path.display().to_string(),
            path,
        }
    }
}

impl DatasetSource for FileSource {
    fn location(&self) -> &str {
        &self.location
    }

    fn fetch(&self) -> BoxFuture<'_, Result<String, FetchError>> {
        Box::pin(async move {
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|e| FetchError::with_source("Failed to read dataset file", e))
        })
    }
}

/// Fixed document, or a fixed failure when `None`.
pub struct MemorySource {
    text: Option<String>,
}

impl MemorySource {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    pub fn failing() -> Self {
        Self { text: None }
    }
}

impl DatasetSource for MemorySource {
    fn location(&self) -> &str {
        "memory"
    }

    fn fetch(&self) -> BoxFuture<'_, Result<String, FetchError>> {
        Box::pin(async move {
            self.text
                .clone()
                .ok_or_else(|| FetchError::new("memory source has no document"))
        })
    }
}

/// Picks a source by scheme: `http(s)://` goes over the network, anything
/// else (optionally `file://`) is a local path.
pub fn source_for(location: &str) -> Box<dyn DatasetSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpSource::new(location))
    } else {
        let path = location.strip_prefix("file://").unwrap_or(location);
        Box::new(FileSource::new(path))
    }
}

pub struct DatasetLoader {
    source: Box<dyn DatasetSource>,
    format: DataFormat,
    current: Arc<Dataset>,
    failures: u64,
}

impl DatasetLoader {
    pub fn new(source: Box<dyn DatasetSource>, format: DataFormat) -> Self {
        Self {
            source,
            format,
            current: Arc::new(Dataset::empty()),
            failures: 0,
        }
    }

    /// The last successfully loaded dataset; empty before the first one.
    pub fn current(&self) -> Arc<Dataset> {
        Arc::clone(&self.current)
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// Fetches and parses once. On failure the previously published dataset
    /// stays current.
    pub async fn load(&mut self) -> Result<Arc<Dataset>, FetchError> {
        match self.fetch_and_parse().await {
            Ok(dataset) => {
                info!(
                    location = self.source.location(),
                    records = dataset.len(),
                    skipped = dataset.skipped(),
                    "dataset loaded"
                );
                self.current = Arc::new(dataset);
                Ok(self.current())
            }
            Err(err) => {
                self.failures += 1;
                warn!(location = self.source.location(), "dataset load failed: {err}");
                Err(err)
            }
        }
    }

    async fn fetch_and_parse(&self) -> Result<Dataset, FetchError> {
        let text = self.source.fetch().await?;
        Dataset::parse(self.format, &text)
            .map_err(|e| FetchError::with_source("Failed to parse dataset", e))
    }
}
