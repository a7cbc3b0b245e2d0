//! The translator service: bundle loading, key resolution, language switching.

use crate::dom::{Document, Marker};
use crate::error::I18nError;
use crate::events::{AppEvent, EventBus};
use crate::i18n::interpolate::{interpolate, Param};
use crate::i18n::tree::{language_subtree, TranslationTree};
use crate::i18n::{BundleSource, Language, LanguageRegistry, LookupMetrics, MetricsReport};
use crate::storage::{PreferenceStore, LANGUAGE_KEY};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Bundles every translator loads unless told otherwise.
pub const DEFAULT_BUNDLES: [&str; 2] = ["common", "homepage"];

/// Resolves dotted keys against the merged bundles of the current language.
///
/// Built once by the application's composition root and passed to whatever
/// needs it; there is no global instance.
pub struct Translator {
    current: Language,
    fallback: Language,
    bundles: Vec<String>,
    tree: TranslationTree,
    source: Arc<dyn BundleSource>,
    store: Arc<dyn PreferenceStore>,
    bus: EventBus,
    document: Option<Box<dyn Document>>,
    metrics: LookupMetrics,
}

impl Translator {
    /// Create a translator in the persisted language (or the fallback).
    ///
    /// Nothing is loaded yet; call `init` or `load_translations`.
    pub fn new(
        source: Arc<dyn BundleSource>,
        store: Arc<dyn PreferenceStore>,
        bus: EventBus,
    ) -> Self {
        let fallback = Language::fallback();
        let current = stored_language(store.as_ref()).unwrap_or(fallback);

        Self {
            current,
            fallback,
            bundles: DEFAULT_BUNDLES.iter().map(|name| name.to_string()).collect(),
            tree: TranslationTree::new(),
            source,
            store,
            bus,
            document: None,
            metrics: LookupMetrics::new(),
        }
    }

    /// Replace the bundle list. Duplicates are dropped, order is kept.
    pub fn with_bundles<I, S>(mut self, bundles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bundles.clear();
        for bundle in bundles {
            self.register_bundle(bundle);
        }
        self
    }

    /// Render into `document` on every load and language switch.
    pub fn attach_document(&mut self, document: Box<dyn Document>) {
        self.document = Some(document);
    }

    pub fn detach_document(&mut self) -> Option<Box<dyn Document>> {
        self.document.take()
    }

    /// Load every bundle, install the language switcher, and render.
    pub async fn init(&mut self) {
        self.load_translations().await;
        if let Some(document) = self.document.as_mut() {
            document.install_language_switcher();
        }
        self.update_dom();
    }

    /// Rebuild the merged tree for the current language.
    ///
    /// Bundles are fetched one at a time in registration order and merged
    /// shallowly, later bundles winning on collision. A bundle that cannot be
    /// fetched, parsed, or lacks the current language is fetched again and
    /// its fallback-language translations merged instead. A bundle that fails
    /// both ways is skipped. Failures are logged, never returned.
    pub async fn load_translations(&mut self) {
        self.tree = TranslationTree::new();
        let language = self.current;

        for bundle in self.bundles.clone() {
            match self.fetch_subtree(&bundle, language).await {
                Ok(subtree) => {
                    debug!("Merged {} key(s) from {}.json", subtree.len(), bundle);
                    self.tree.merge(subtree);
                }
                Err(e) => {
                    warn!("Error loading {}.json: {}", bundle, e);

                    if language == self.fallback {
                        error!("No translations loaded from {}.json", bundle);
                        self.metrics.record_bundle_failure();
                        continue;
                    }

                    match self.fetch_subtree(&bundle, self.fallback).await {
                        Ok(subtree) => {
                            warn!(
                                "Using '{}' translations for {}.json",
                                self.fallback, bundle
                            );
                            self.metrics.record_fallback_merge();
                            self.tree.merge(subtree);
                        }
                        Err(e) => {
                            error!("Failed to load fallback for {}.json: {}", bundle, e);
                            self.metrics.record_bundle_failure();
                        }
                    }
                }
            }
        }

        info!(
            "Loaded translations for '{}' ({} bundle(s), {} top-level key(s))",
            language,
            self.bundles.len(),
            self.tree.len()
        );
    }

    async fn fetch_subtree(
        &self,
        bundle: &str,
        language: Language,
    ) -> Result<Map<String, Value>, I18nError> {
        self.metrics.record_bundle_fetch();
        let document = self.source.fetch(bundle).await?;

        language_subtree(document, language).ok_or_else(|| I18nError::MissingLanguage {
            bundle: bundle.to_string(),
            language: language.code(),
        })
    }

    /// Translate `key`, filling `{{name}}` placeholders from `params`.
    ///
    /// A key with no translation comes back unchanged. Values that are not
    /// strings (e.g. a whole section object) are returned as JSON text.
    pub fn translate(&self, key: &str, params: &[Param<'_>]) -> String {
        render(&self.tree, &self.metrics, key, params)
    }

    /// `translate` without parameters.
    pub fn t(&self, key: &str) -> String {
        self.translate(key, &[])
    }

    /// The raw value under `key`, whatever its JSON type.
    pub fn resolve(&self, key: &str) -> Option<&Value> {
        self.metrics.record_lookup();
        let value = self.tree.get(key);
        if value.is_none() {
            self.metrics.record_miss();
            warn!("Translation missing for key: {}", key);
        }
        value
    }

    /// Switch to `code`, persist it, reload, re-render and broadcast.
    ///
    /// An unsupported code is rejected before anything changes.
    pub async fn set_language(&mut self, code: &str) -> Result<(), I18nError> {
        let language = Language::from_code(code).map_err(|e| {
            error!("{}", e);
            e
        })?;

        self.current = language;
        if let Err(e) = self.store.set(LANGUAGE_KEY, language.code()) {
            error!("Failed to persist language '{}': {}", language, e);
        }

        self.load_translations().await;
        self.update_dom();
        self.bus.publish(AppEvent::LanguageChanged { language });

        info!("Language changed to {} ({})", language.name(), language);
        Ok(())
    }

    /// Handle a click on a language-switcher button of the attached document.
    ///
    /// Returns `Ok(false)` when `element` is not a switcher button or no
    /// document is attached.
    pub async fn activate_switcher(&mut self, element: usize) -> Result<bool, I18nError> {
        let Some(code) = self
            .document
            .as_ref()
            .and_then(|document| document.switcher_language(element))
        else {
            debug!("Element {} is not a language button", element);
            return Ok(false);
        };

        self.set_language(&code).await?;
        Ok(true)
    }

    /// Add a bundle to load on the next `load_translations`.
    ///
    /// Returns `false` if it was already registered.
    pub fn register_bundle(&mut self, bundle: impl Into<String>) -> bool {
        let bundle = bundle.into();
        if self.bundles.contains(&bundle) {
            return false;
        }
        debug!("Registered bundle {}", bundle);
        self.bundles.push(bundle);
        true
    }

    /// Write translations into every tagged element of the attached document.
    pub fn update_dom(&mut self) {
        let Some(document) = self.document.as_mut() else {
            return;
        };

        for marker in Marker::ALL {
            for (element, key) in document.tagged(marker) {
                let text = render(&self.tree, &self.metrics, &key, &[]);
                document.apply(element, marker, &text);
            }
        }
        document.set_active_language(self.current);
    }

    pub fn current_language(&self) -> Language {
        self.current
    }

    pub fn fallback_language(&self) -> Language {
        self.fallback
    }

    pub fn is_language_supported(&self, code: &str) -> bool {
        LanguageRegistry::get().is_supported(code)
    }

    pub fn supported_languages(&self) -> Vec<Language> {
        Language::all()
    }

    pub fn bundles(&self) -> &[String] {
        &self.bundles
    }

    pub fn tree(&self) -> &TranslationTree {
        &self.tree
    }

    pub fn source(&self) -> Arc<dyn BundleSource> {
        Arc::clone(&self.source)
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn metrics(&self) -> MetricsReport {
        self.metrics.report()
    }
}

fn stored_language(store: &dyn PreferenceStore) -> Option<Language> {
    match store.get(LANGUAGE_KEY) {
        Ok(Some(code)) => match Language::from_code(&code) {
            Ok(language) => Some(language),
            Err(e) => {
                warn!("Ignoring stored language: {}", e);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!("Failed to read stored language: {}", e);
            None
        }
    }
}

fn render(
    tree: &TranslationTree,
    metrics: &LookupMetrics,
    key: &str,
    params: &[Param<'_>],
) -> String {
    metrics.record_lookup();
    match tree.get(key) {
        None => {
            metrics.record_miss();
            warn!("Translation missing for key: {}", key);
            key.to_string()
        }
        Some(Value::String(text)) if !params.is_empty() => interpolate(text, params),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}
