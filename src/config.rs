use crate::events::{EventBus, DEFAULT_CAPACITY};
use crate::i18n::{BundleSource, DirBundleSource, HttpBundleSource, DEFAULT_BUNDLES};
use crate::storage::JsonFileStore;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Config {
    // Bundles
    pub base_url: Option<String>,
    pub bundle_dir: PathBuf,
    pub bundles: Vec<String>,

    // Preferences
    pub storage_path: PathBuf,

    // Notifications
    pub event_capacity: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let event_capacity = match std::env::var("I18N_EVENT_CAPACITY") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("I18N_EVENT_CAPACITY is not a number: {}", value))?,
            Err(_) => DEFAULT_CAPACITY,
        };

        Ok(Self {
            // Bundles - HTTP when a base URL is given, otherwise the local directory
            base_url: std::env::var("I18N_BASE_URL")
                .ok()
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
            bundle_dir: std::env::var("I18N_BUNDLE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("assets/i18n")),
            bundles: std::env::var("I18N_BUNDLES")
                .ok()
                .map(|list| parse_list(&list))
                .filter(|list| !list.is_empty())
                .unwrap_or_else(|| DEFAULT_BUNDLES.iter().map(|b| b.to_string()).collect()),

            // Preferences
            storage_path: std::env::var("I18N_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/preferences.json")),

            event_capacity,
        })
    }

    /// The configured bundle source.
    pub fn bundle_source(&self) -> Arc<dyn BundleSource> {
        match &self.base_url {
            Some(url) => Arc::new(HttpBundleSource::new(url.clone())),
            None => Arc::new(DirBundleSource::new(self.bundle_dir.clone())),
        }
    }

    pub fn open_store(&self) -> Result<JsonFileStore> {
        JsonFileStore::open(&self.storage_path).with_context(|| {
            format!(
                "Failed to open preference store at {}",
                self.storage_path.display()
            )
        })
    }

    pub fn event_bus(&self) -> EventBus {
        EventBus::new(self.event_capacity)
    }
}

fn parse_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
