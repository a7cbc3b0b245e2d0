use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while fetching bundles or switching languages.
///
/// Most of these never reach callers of `Translator`: bundle failures are
/// logged and degrade to "skip this bundle", missing keys degrade to the raw
/// key. They surface from the lower-level `BundleSource` API and from
/// `Translator::set_language`.
#[derive(Debug, Error)]
pub enum I18nError {
    #[error("Unsupported language: '{0}'")]
    UnsupportedLanguage(String),

    #[error("Failed to request bundle '{bundle}': {source}")]
    Request {
        bundle: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to load {bundle}.json ({status})")]
    Status {
        bundle: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to read bundle '{bundle}' from {path}: {source}")]
    Io {
        bundle: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {bundle}.json: {source}")]
    Parse {
        bundle: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Bundle '{bundle}' has no '{language}' translations")]
    MissingLanguage {
        bundle: String,
        language: &'static str,
    },

    #[error("Unknown bundle '{0}'")]
    UnknownBundle(String),
}

/// Errors raised by preference stores.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to access preferences at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Preferences at {path} are not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Preference store lock was poisoned")]
    Poisoned,
}
