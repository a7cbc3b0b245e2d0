//! Document contract for elements that display translated text.
//!
//! Elements opt in with a marker attribute holding the lookup key, e.g.
//! `<input data-i18n-placeholder="search.placeholder">`. Language-switcher
//! buttons carry `data-lang` and get the `active` class when their language
//! is current.

use crate::i18n::Language;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

/// Attribute on language-switcher buttons holding their language code.
pub const LANGUAGE_BUTTON_ATTRIBUTE: &str = "data-lang";

/// Class set on the switcher button of the current language.
pub const ACTIVE_CLASS: &str = "active";

const SWITCHER_CLASS: &str = "language-switcher";

/// Which part of an element a marker attribute translates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    Text,
    Placeholder,
    Alt,
    Title,
}

impl Marker {
    pub const ALL: [Marker; 4] = [Marker::Text, Marker::Placeholder, Marker::Alt, Marker::Title];

    pub fn attribute(self) -> &'static str {
        match self {
            Marker::Text => "data-i18n",
            Marker::Placeholder => "data-i18n-placeholder",
            Marker::Alt => "data-i18n-alt",
            Marker::Title => "data-i18n-title",
        }
    }
}

/// A page the translator renders into.
pub trait Document: Send + Sync {
    /// Every element carrying `marker`, as (element handle, lookup key).
    fn tagged(&self, marker: Marker) -> Vec<(usize, String)>;

    /// Write translated text into the slot `marker` addresses.
    fn apply(&mut self, element: usize, marker: Marker, text: &str);

    /// Mark the switcher button for `language` active and clear the others.
    fn set_active_language(&mut self, language: Language);

    /// Language code carried by `element`, if it is a switcher button.
    fn switcher_language(&self, element: usize) -> Option<String>;

    /// Add language-switcher buttons if the page has none.
    fn install_language_switcher(&mut self) {}
}

/// A page shared with code outside the translator. A poisoned lock renders
/// nothing.
impl<D: Document> Document for Arc<Mutex<D>> {
    fn tagged(&self, marker: Marker) -> Vec<(usize, String)> {
        self.lock()
            .map(|document| document.tagged(marker))
            .unwrap_or_default()
    }

    fn apply(&mut self, element: usize, marker: Marker, text: &str) {
        if let Ok(mut document) = self.lock() {
            document.apply(element, marker, text);
        }
    }

    fn set_active_language(&mut self, language: Language) {
        if let Ok(mut document) = self.lock() {
            document.set_active_language(language);
        }
    }

    fn switcher_language(&self, element: usize) -> Option<String> {
        self.lock().ok()?.switcher_language(element)
    }

    fn install_language_switcher(&mut self) {
        if let Ok(mut document) = self.lock() {
            document.install_language_switcher();
        }
    }
}

/// A tagged element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub classes: BTreeSet<String>,
    pub text: String,
    pub placeholder: String,
    pub alt: String,
    pub title: String,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.insert(class.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    fn slot_mut(&mut self, marker: Marker) -> &mut String {
        match marker {
            Marker::Text => &mut self.text,
            Marker::Placeholder => &mut self.placeholder,
            Marker::Alt => &mut self.alt,
            Marker::Title => &mut self.title,
        }
    }
}

/// Flat in-memory page.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    elements: Vec<Element>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element and return its handle.
    pub fn push(&mut self, element: Element) -> usize {
        self.elements.push(element);
        self.elements.len() - 1
    }

    pub fn element(&self, handle: usize) -> Option<&Element> {
        self.elements.get(handle)
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }
}

impl Document for MemoryDocument {
    fn tagged(&self, marker: Marker) -> Vec<(usize, String)> {
        self.elements
            .iter()
            .enumerate()
            .filter_map(|(handle, element)| {
                element
                    .attribute(marker.attribute())
                    .map(|key| (handle, key.to_string()))
            })
            .collect()
    }

    fn apply(&mut self, element: usize, marker: Marker, text: &str) {
        if let Some(element) = self.elements.get_mut(element) {
            *element.slot_mut(marker) = text.to_string();
        }
    }

    fn set_active_language(&mut self, language: Language) {
        for element in &mut self.elements {
            let is_current = element
                .attribute(LANGUAGE_BUTTON_ATTRIBUTE)
                .map(|code| code == language.code());
            match is_current {
                Some(true) => {
                    element.classes.insert(ACTIVE_CLASS.to_string());
                }
                Some(false) => {
                    element.classes.remove(ACTIVE_CLASS);
                }
                None => {}
            }
        }
    }

    fn switcher_language(&self, element: usize) -> Option<String> {
        self.element(element)?
            .attribute(LANGUAGE_BUTTON_ATTRIBUTE)
            .map(str::to_string)
    }

    fn install_language_switcher(&mut self) {
        if self.elements.iter().any(|element| element.has_class(SWITCHER_CLASS)) {
            return;
        }

        self.push(Element::new("div").with_class(SWITCHER_CLASS));
        for language in Language::all() {
            self.push(
                Element::new("button")
                    .with_class("lang-btn")
                    .with_attribute(LANGUAGE_BUTTON_ATTRIBUTE, language.code())
                    .with_attribute(
                        Marker::Text.attribute(),
                        format!("language.{}", language.name().to_lowercase()),
                    )
                    .with_text(language.native_name()),
            );
        }
    }
}
