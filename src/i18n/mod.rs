//! Internationalization (i18n) for the site's English and Hawaiian pages.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for supported languages and their metadata
//! - `language`: Type-safe Language handle backed by the registry
//! - `source`: Where translation bundles come from (HTTP, directory, embedded, memory)
//! - `tree`: The merged translation tree and dotted-key lookup
//! - `interpolate`: `{{name}}` placeholder substitution
//! - `translator`: Loads bundles, resolves keys, switches language
//! - `validator`: Bundle consistency checks across languages
//! - `metrics`: Lookup and load counters
//!
//! # Example
//!
//! ```rust,ignore
//! use jemt4_i18n::i18n::{EmbeddedBundleSource, Translator};
//!
//! let mut translator = Translator::new(Arc::new(EmbeddedBundleSource), store, bus);
//! translator.init().await;
//! let text = translator.translate("messages.welcome", &[("name", &"Kai")]);
//! ```

mod interpolate;
mod language;
mod metrics;
mod registry;
mod source;
pub(crate) mod tree;
mod translator;
mod validator;

pub use interpolate::{interpolate, Param};
pub use language::Language;
pub use metrics::{LookupMetrics, MetricsReport};
pub use registry::{LanguageConfig, LanguageRegistry};
pub use source::{
    BundleSource, DirBundleSource, EmbeddedBundleSource, HttpBundleSource, MemoryBundleSource,
};
pub use translator::{Translator, DEFAULT_BUNDLES};
pub use tree::TranslationTree;
pub use validator::{BundleValidator, ValidationReport};
