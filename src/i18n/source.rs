//! Bundle sources: where `<name>.json` translation documents come from.

use crate::error::I18nError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// Fetches a bundle document by name.
///
/// A document is a JSON object keyed by language code. Every call performs a
/// fresh fetch; sources do not cache.
#[async_trait]
pub trait BundleSource: Send + Sync {
    async fn fetch(&self, bundle: &str) -> Result<Value, I18nError>;
}

/// Fetches `{base_url}/{bundle}.json` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBundleSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBundleSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn bundle_url(&self, bundle: &str) -> String {
        format!("{}/{}.json", self.base_url.trim_end_matches('/'), bundle)
    }
}

#[async_trait]
impl BundleSource for HttpBundleSource {
    async fn fetch(&self, bundle: &str) -> Result<Value, I18nError> {
        let url = self.bundle_url(bundle);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| I18nError::Request {
                bundle: bundle.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(I18nError::Status {
                bundle: bundle.to_string(),
                status: response.status(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| I18nError::Request {
                bundle: bundle.to_string(),
                source,
            })?;

        serde_json::from_str(&body).map_err(|source| I18nError::Parse {
            bundle: bundle.to_string(),
            source,
        })
    }
}

/// Reads `{dir}/{bundle}.json` from the local filesystem.
#[derive(Debug, Clone)]
pub struct DirBundleSource {
    dir: PathBuf,
}

impl DirBundleSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    /// Names of every `*.json` bundle in the directory, sorted.
    pub async fn bundle_names(&self) -> Result<Vec<String>, I18nError> {
        let io_error = |source: std::io::Error| I18nError::Io {
            bundle: "*".to_string(),
            path: self.dir.clone(),
            source,
        };

        let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(io_error)?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

#[async_trait]
impl BundleSource for DirBundleSource {
    async fn fetch(&self, bundle: &str) -> Result<Value, I18nError> {
        let path = self.dir.join(format!("{}.json", bundle));
        debug!("Reading {}", path.display());

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| I18nError::Io {
                bundle: bundle.to_string(),
                path: path.clone(),
                source,
            })?;

        serde_json::from_str(&content).map_err(|source| I18nError::Parse {
            bundle: bundle.to_string(),
            source,
        })
    }
}

/// Bundles compiled into the binary from `assets/i18n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedBundleSource;

impl EmbeddedBundleSource {
    fn raw(bundle: &str) -> Option<&'static str> {
        match bundle {
            "common" => Some(include_str!("../../assets/i18n/common.json")),
            "homepage" => Some(include_str!("../../assets/i18n/homepage.json")),
            "settings" => Some(include_str!("../../assets/i18n/settings.json")),
            _ => None,
        }
    }
}

#[async_trait]
impl BundleSource for EmbeddedBundleSource {
    async fn fetch(&self, bundle: &str) -> Result<Value, I18nError> {
        let raw = Self::raw(bundle).ok_or_else(|| I18nError::UnknownBundle(bundle.to_string()))?;
        serde_json::from_str(raw).map_err(|source| I18nError::Parse {
            bundle: bundle.to_string(),
            source,
        })
    }
}

/// In-memory bundle documents, for embedding applications and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryBundleSource {
    documents: HashMap<String, Value>,
}

impl MemoryBundleSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bundle(mut self, bundle: impl Into<String>, document: Value) -> Self {
        self.insert(bundle, document);
        self
    }

    pub fn insert(&mut self, bundle: impl Into<String>, document: Value) {
        self.documents.insert(bundle.into(), document);
    }
}

#[async_trait]
impl BundleSource for MemoryBundleSource {
    async fn fetch(&self, bundle: &str) -> Result<Value, I18nError> {
        self.documents
            .get(bundle)
            .cloned()
            .ok_or_else(|| I18nError::UnknownBundle(bundle.to_string()))
    }
}
