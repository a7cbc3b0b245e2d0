//! Bundle quality validation.
//!
//! Checks that every supported language in a bundle document covers the same
//! keys as the fallback language and keeps the same `{{placeholders}}`.

use crate::i18n::tree::leaf_paths;
use crate::i18n::{Language, LanguageRegistry, TranslationTree};
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Validation report containing errors and warnings about a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that make a language unusable for the bundle
    pub errors: Vec<String>,

    /// Keys that will render as raw keys, or placeholders that will not be filled
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for bundle documents.
pub struct BundleValidator;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

impl BundleValidator {
    /// Validate one bundle document against the fallback language.
    pub fn validate(bundle: &str, document: &Value) -> ValidationReport {
        let mut report = ValidationReport::new();

        let Some(languages) = document.as_object() else {
            report
                .errors
                .push(format!("{}: document is not an object keyed by language", bundle));
            return report;
        };

        for code in languages.keys() {
            if !LanguageRegistry::get().is_supported(code) {
                report
                    .warnings
                    .push(format!("{}: unsupported language '{}' is ignored", bundle, code));
            }
        }

        let fallback = Language::fallback();
        let Some(reference) = Self::subtree(document, fallback) else {
            report.errors.push(format!(
                "{}: missing '{}' translations (fallback language)",
                bundle,
                fallback.code()
            ));
            return report;
        };
        let reference_keys: BTreeSet<String> = leaf_paths(&reference).into_iter().collect();
        let reference_tree = Self::tree(&reference);

        for language in Language::all().into_iter().filter(|lang| *lang != fallback) {
            let Some(subtree) = Self::subtree(document, language) else {
                report.errors.push(format!(
                    "{}: missing '{}' translations",
                    bundle,
                    language.code()
                ));
                continue;
            };

            let keys: BTreeSet<String> = leaf_paths(&subtree).into_iter().collect();
            let tree = Self::tree(&subtree);

            for key in reference_keys.difference(&keys) {
                report.warnings.push(format!(
                    "{}: '{}' has no '{}' translation",
                    bundle,
                    key,
                    language.code()
                ));
            }

            for key in keys.difference(&reference_keys) {
                report.warnings.push(format!(
                    "{}: '{}' exists in '{}' but not in '{}'",
                    bundle,
                    key,
                    language.code(),
                    fallback.code()
                ));
            }

            for key in reference_keys.intersection(&keys) {
                let expected = Self::placeholders_at(&reference_tree, key);
                let actual = Self::placeholders_at(&tree, key);
                if expected != actual {
                    report.warnings.push(format!(
                        "{}: placeholder mismatch for '{}': '{}' has {:?}, '{}' has {:?}",
                        bundle,
                        key,
                        fallback.code(),
                        expected,
                        language.code(),
                        actual
                    ));
                }
            }
        }

        report
    }

    /// Extract the names of all `{{placeholders}}` in a template.
    pub fn placeholders(text: &str) -> BTreeSet<String> {
        let regex =
            PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\{\{([^{}]+)\}\}").unwrap());

        regex
            .captures_iter(text)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }

    fn subtree(document: &Value, language: Language) -> Option<Value> {
        document
            .get(language.code())
            .filter(|value| value.is_object())
            .cloned()
    }

    fn tree(subtree: &Value) -> TranslationTree {
        let mut tree = TranslationTree::new();
        if let Value::Object(map) = subtree {
            tree.merge(map.clone());
        }
        tree
    }

    fn placeholders_at(tree: &TranslationTree, key: &str) -> BTreeSet<String> {
        tree.get(key)
            .and_then(Value::as_str)
            .map(Self::placeholders)
            .unwrap_or_default()
    }
}
