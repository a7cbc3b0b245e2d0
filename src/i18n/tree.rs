//! Merged single-language lookup tree.

use crate::i18n::Language;
use serde_json::{Map, Value};

/// Translations for the current language, merged from every loaded bundle.
///
/// Merging is shallow: a bundle's top-level key replaces the whole value
/// already stored under that key, nested objects are never combined.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationTree {
    root: Map<String, Value>,
}

impl TranslationTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a bundle's sub-tree, overwriting on top-level key collision.
    pub fn merge(&mut self, subtree: Map<String, Value>) {
        for (key, value) in subtree {
            self.root.insert(key, value);
        }
    }

    /// Walk a dot-separated key through the tree.
    ///
    /// Returns `None` when a segment is missing, when the walk runs into a
    /// leaf before the last segment, or when the final value is `null`.
    /// Array elements are addressed by their numeric index.
    pub fn get(&self, key: &str) -> Option<&Value> {
        let mut segments = key.split('.');
        let first = segments.next()?;
        let mut value = self.root.get(first)?;

        for segment in segments {
            value = match value {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }

        match value {
            Value::Null => None,
            value => Some(value),
        }
    }

    /// Top-level keys, in map order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.root.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

/// Take one language's sub-tree out of a bundle document.
///
/// Returns `None` when the document is not an object, has no entry for the
/// language, or the entry is not an object.
pub fn language_subtree(document: Value, language: Language) -> Option<Map<String, Value>> {
    match document {
        Value::Object(mut languages) => match languages.remove(language.code()) {
            Some(Value::Object(subtree)) => Some(subtree),
            _ => None,
        },
        _ => None,
    }
}

/// Every dot-separated path to a string leaf under `value`.
pub fn leaf_paths(value: &Value) -> Vec<String> {
    let mut paths = Vec::new();
    collect_leaf_paths(value, String::new(), &mut paths);
    paths
}

fn collect_leaf_paths(value: &Value, prefix: String, paths: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                collect_leaf_paths(child, path, paths);
            }
        }
        Value::String(_) if !prefix.is_empty() => paths.push(prefix),
        _ => {}
    }
}
