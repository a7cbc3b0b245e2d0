//! Language registry: Single source of truth for all supported languages.
//!
//! The registry is immutable data shared by every translator, so it lives in a
//! `OnceLock` and is initialized on first access.

use std::sync::OnceLock;

/// Configuration for a supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// Language code used in bundle documents and storage (e.g., "en", "haw")
    pub code: &'static str,

    /// English name of the language (e.g., "English", "Hawaiian")
    pub name: &'static str,

    /// Native name of the language (e.g., "English", "ʻŌlelo Hawaiʻi")
    pub native_name: &'static str,

    /// Whether this language is substituted when another one is unavailable
    /// (only one should be true)
    pub is_fallback: bool,
}

/// Registry of every language the interface can be displayed in.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its code.
    ///
    /// # Returns
    /// * `Some(&LanguageConfig)` if the language is supported
    /// * `None` otherwise
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// All supported languages, in display order.
    pub fn list(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().collect()
    }

    /// Get the fallback language configuration.
    ///
    /// # Panics
    /// Panics if the registry does not define exactly one fallback language
    /// (this indicates a configuration error).
    pub fn fallback(&self) -> &LanguageConfig {
        let fallbacks: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_fallback)
            .collect();

        match fallbacks.len() {
            0 => panic!("No fallback language found in registry"),
            1 => fallbacks[0],
            _ => panic!("Multiple fallback languages found in registry"),
        }
    }

    /// Check if a language code is supported.
    pub fn is_supported(&self, code: &str) -> bool {
        self.get_by_code(code).is_some()
    }
}

/// English (fallback) and Hawaiian.
fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "en",
            name: "English",
            native_name: "English",
            is_fallback: true,
        },
        LanguageConfig {
            code: "haw",
            name: "Hawaiian",
            native_name: "ʻŌlelo Hawaiʻi",
            is_fallback: false,
        },
    ]
}
