//! Settings modal: language choice and primary-instrument preference.
//!
//! The controller keeps its own copy of the `settings` bundle for its labels
//! and talks to the translator only to read or switch the language.

use crate::events::{AppEvent, EventBus};
use crate::i18n::{Language, Translator};
use crate::storage::{PreferenceStore, INSTRUMENT_KEY};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, error, info, warn};

/// Bundle holding the modal's labels.
pub const SETTINGS_BUNDLE: &str = "settings";

/// The instrument a visitor plays most.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Instrument {
    #[default]
    None,
    Ukulele,
    Guitar,
    AcousticBass,
    ElectricBass,
}

impl Instrument {
    pub const ALL: [Instrument; 5] = [
        Instrument::None,
        Instrument::Ukulele,
        Instrument::Guitar,
        Instrument::AcousticBass,
        Instrument::ElectricBass,
    ];

    /// Value stored in preferences and used as the label key suffix.
    pub fn value(self) -> &'static str {
        match self {
            Instrument::None => "none",
            Instrument::Ukulele => "ukulele",
            Instrument::Guitar => "guitar",
            Instrument::AcousticBass => "acousticBass",
            Instrument::ElectricBass => "electricBass",
        }
    }

    pub fn from_value(value: &str) -> Option<Instrument> {
        Self::ALL.into_iter().find(|instrument| instrument.value() == value)
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

/// What the visitor selected when pressing save. `None` means no choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SettingsForm {
    pub language: Option<Language>,
    pub instrument: Option<Instrument>,
}

/// One radio option in the modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub value: &'static str,
    pub label: String,
    pub checked: bool,
}

/// A titled group of radio options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsSection {
    pub title: String,
    pub description: String,
    pub options: Vec<ChoiceOption>,
}

/// Everything the modal displays, in the controller's current language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsView {
    pub title: String,
    pub language: SettingsSection,
    pub instrument: SettingsSection,
    pub cancel_label: String,
    pub save_label: String,
}

/// Owns the settings modal state and persists the instrument preference.
pub struct SettingsController {
    current_language: Language,
    primary_instrument: Instrument,
    labels: Value,
    open: bool,
    store: Arc<dyn PreferenceStore>,
    bus: EventBus,
    events: broadcast::Receiver<AppEvent>,
}

impl SettingsController {
    pub fn new(translator: &Translator, store: Arc<dyn PreferenceStore>, bus: EventBus) -> Self {
        let primary_instrument = stored_instrument(store.as_ref()).unwrap_or_default();
        let events = bus.subscribe();

        Self {
            current_language: translator.current_language(),
            primary_instrument,
            labels: Value::Null,
            open: false,
            store,
            bus,
            events,
        }
    }

    /// Register the settings bundle with the translator and load labels.
    ///
    /// The translator picks the bundle up on its next load. A failed fetch
    /// leaves the labels empty, so every label shows its key.
    pub async fn init(&mut self, translator: &mut Translator) {
        translator.register_bundle(SETTINGS_BUNDLE);

        match translator.source().fetch(SETTINGS_BUNDLE).await {
            Ok(document) => {
                debug!("Loaded settings labels");
                self.labels = document;
            }
            Err(e) => {
                error!("Failed to load settings translations: {}", e);
                self.labels = Value::Null;
            }
        }
    }

    /// Label for `key` in the current language, then the fallback, then the key.
    pub fn label(&self, key: &str) -> String {
        let fallback = Language::fallback();
        lookup(&self.labels, self.current_language, key)
            .or_else(|| {
                if self.current_language == fallback {
                    None
                } else {
                    lookup(&self.labels, fallback, key)
                }
            })
            .unwrap_or_else(|| key.to_string())
    }

    /// Build the modal contents, applying pending notifications first.
    pub fn view(&mut self) -> SettingsView {
        self.sync_events();

        let language_options = Language::all()
            .into_iter()
            .map(|language| ChoiceOption {
                value: language.code(),
                label: self.label(&format!("language.{}", language.name().to_lowercase())),
                checked: language == self.current_language,
            })
            .collect();

        let instrument_options = Instrument::ALL
            .into_iter()
            .map(|instrument| ChoiceOption {
                value: instrument.value(),
                label: self.label(&format!("primaryInstrument.{}", instrument.value())),
                checked: instrument == self.primary_instrument,
            })
            .collect();

        SettingsView {
            title: self.label("title"),
            language: SettingsSection {
                title: self.label("language.title"),
                description: self.label("language.description"),
                options: language_options,
            },
            instrument: SettingsSection {
                title: self.label("primaryInstrument.title"),
                description: self.label("primaryInstrument.description"),
                options: instrument_options,
            },
            cancel_label: self.label("buttons.cancel"),
            save_label: self.label("buttons.save"),
        }
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Escape closes the modal when it is open. Returns whether it did.
    pub fn handle_escape(&mut self) -> bool {
        if self.open {
            self.close();
            true
        } else {
            false
        }
    }

    /// Apply the form, then close the modal.
    ///
    /// A changed language goes through the translator. The instrument is
    /// stored directly and announced on the bus.
    pub async fn save(&mut self, translator: &mut Translator, form: SettingsForm) {
        self.sync_events();
        self.current_language = translator.current_language();

        if let Some(language) = form.language {
            if language != self.current_language {
                match translator.set_language(language.code()).await {
                    Ok(()) => self.current_language = language,
                    Err(e) => error!("Failed to switch language: {}", e),
                }
            }
        }

        if let Some(instrument) = form.instrument {
            self.primary_instrument = instrument;
            if let Err(e) = self.store.set(INSTRUMENT_KEY, instrument.value()) {
                error!("Failed to persist primary instrument '{}': {}", instrument, e);
            }
            self.bus.publish(AppEvent::InstrumentChanged { instrument });
            info!("Primary instrument set to {}", instrument);
        }

        self.close();
    }

    /// Apply pending bus notifications. Returns how many were handled.
    pub fn sync_events(&mut self) -> usize {
        let mut handled = 0;
        loop {
            match self.events.try_recv() {
                Ok(AppEvent::LanguageChanged { language }) => {
                    self.current_language = language;
                    handled += 1;
                }
                Ok(AppEvent::InstrumentChanged { .. }) => handled += 1,
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!("Settings missed {} notification(s)", skipped);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        handled
    }

    pub fn current_language(&self) -> Language {
        self.current_language
    }

    pub fn primary_instrument(&self) -> Instrument {
        self.primary_instrument
    }
}

fn stored_instrument(store: &dyn PreferenceStore) -> Option<Instrument> {
    match store.get(INSTRUMENT_KEY) {
        Ok(Some(value)) => {
            let instrument = Instrument::from_value(&value);
            if instrument.is_none() {
                warn!("Ignoring stored primary instrument '{}'", value);
            }
            instrument
        }
        Ok(None) => None,
        Err(e) => {
            warn!("Failed to read primary instrument: {}", e);
            None
        }
    }
}

fn lookup(labels: &Value, language: Language, key: &str) -> Option<String> {
    let mut value = labels.get(language.code())?;
    for segment in key.split('.') {
        value = value.get(segment)?;
    }
    value
        .as_str()
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::MemoryBundleSource;
    use crate::storage::{MemoryStore, LANGUAGE_KEY};
    use serde_json::json;

    // ==================== Test Helpers ====================

    fn settings_bundle() -> Value {
        json!({
            "en": {
                "title": "Settings",
                "language": {
                    "title": "Language",
                    "description": "Choose the language for the interface.",
                    "english": "English",
                    "hawaiian": "ʻŌlelo Hawaiʻi"
                },
                "primaryInstrument": {
                    "title": "Primary instrument",
                    "description": "Pick the instrument you play most often.",
                    "none": "No preference",
                    "ukulele": "Ukulele",
                    "guitar": "Guitar",
                    "acousticBass": "Acoustic bass",
                    "electricBass": "Electric bass"
                },
                "buttons": { "cancel": "Cancel", "save": "Save" }
            },
            "haw": {
                "title": "Nā Hoʻonohonoho",
                "primaryInstrument": { "guitar": "Kīkā" },
                "buttons": { "cancel": "Hoʻōki", "save": "Mālama" }
            }
        })
    }

    fn source() -> Arc<MemoryBundleSource> {
        Arc::new(
            MemoryBundleSource::new()
                .with_bundle("common", json!({ "en": { "a": "A" }, "haw": { "a": "ʻA" } }))
                .with_bundle("homepage", json!({ "en": {}, "haw": {} }))
                .with_bundle(SETTINGS_BUNDLE, settings_bundle()),
        )
    }

    async fn setup(store: Arc<MemoryStore>) -> (Translator, SettingsController, EventBus) {
        let bus = EventBus::default();
        let mut translator = Translator::new(source(), store.clone(), bus.clone());
        translator.load_translations().await;
        let mut settings = SettingsController::new(&translator, store, bus.clone());
        settings.init(&mut translator).await;
        (translator, settings, bus)
    }

    // ==================== Instrument Tests ====================

    #[test]
    fn test_instrument_values_round_trip() {
        for instrument in Instrument::ALL {
            assert_eq!(Instrument::from_value(instrument.value()), Some(instrument));
        }
        assert_eq!(Instrument::from_value("banjo"), None);
    }

    #[test]
    fn test_instrument_serde_matches_value() {
        let json = serde_json::to_string(&Instrument::ElectricBass).expect("serialize");
        assert_eq!(json, "\"electricBass\"");
        let parsed: Instrument = serde_json::from_str("\"acousticBass\"").expect("parse");
        assert_eq!(parsed, Instrument::AcousticBass);
    }

    // ==================== Construction Tests ====================

    #[tokio::test]
    async fn test_new_reads_language_and_instrument() {
        let store = Arc::new(MemoryStore::new());
        store.set(LANGUAGE_KEY, "haw").unwrap();
        store.set(INSTRUMENT_KEY, "guitar").unwrap();

        let (_, settings, _) = setup(store).await;

        assert_eq!(settings.current_language(), Language::HAWAIIAN);
        assert_eq!(settings.primary_instrument(), Instrument::Guitar);
    }

    #[tokio::test]
    async fn test_unknown_stored_instrument_defaults_to_none() {
        let store = Arc::new(MemoryStore::new());
        store.set(INSTRUMENT_KEY, "banjo").unwrap();

        let (_, settings, _) = setup(store).await;
        assert_eq!(settings.primary_instrument(), Instrument::None);
    }

    #[tokio::test]
    async fn test_init_registers_settings_bundle() {
        let (translator, _, _) = setup(Arc::new(MemoryStore::new())).await;
        assert_eq!(translator.bundles(), &["common", "homepage", "settings"]);
    }

    // ==================== Label Tests ====================

    #[tokio::test]
    async fn test_label_falls_back_per_key() {
        let store = Arc::new(MemoryStore::new());
        store.set(LANGUAGE_KEY, "haw").unwrap();
        let (_, settings, _) = setup(store).await;

        assert_eq!(settings.label("title"), "Nā Hoʻonohonoho");
        assert_eq!(settings.label("primaryInstrument.guitar"), "Kīkā");
        assert_eq!(settings.label("primaryInstrument.ukulele"), "Ukulele");
        assert_eq!(settings.label("nothing.here"), "nothing.here");
    }

    #[tokio::test]
    async fn test_label_without_bundle_returns_key() {
        let bus = EventBus::default();
        let store = Arc::new(MemoryStore::new());
        let mut translator = Translator::new(
            Arc::new(MemoryBundleSource::new()),
            store.clone(),
            bus.clone(),
        );
        let mut settings = SettingsController::new(&translator, store, bus);
        settings.init(&mut translator).await;

        assert_eq!(settings.label("buttons.save"), "buttons.save");
    }

    // ==================== View Tests ====================

    #[tokio::test]
    async fn test_view_marks_checked_options() {
        let store = Arc::new(MemoryStore::new());
        store.set(INSTRUMENT_KEY, "ukulele").unwrap();
        let (_, mut settings, _) = setup(store).await;

        let view = settings.view();

        assert_eq!(view.title, "Settings");
        assert_eq!(view.save_label, "Save");
        let checked_language: Vec<_> = view
            .language
            .options
            .iter()
            .filter(|o| o.checked)
            .map(|o| o.value)
            .collect();
        assert_eq!(checked_language, vec!["en"]);
        assert_eq!(view.instrument.options.len(), 5);
        let checked_instrument: Vec<_> = view
            .instrument
            .options
            .iter()
            .filter(|o| o.checked)
            .map(|o| o.value)
            .collect();
        assert_eq!(checked_instrument, vec!["ukulele"]);
        assert_eq!(view.language.options[1].label, "ʻŌlelo Hawaiʻi");
    }

    // ==================== Modal Tests ====================

    #[tokio::test]
    async fn test_open_close_and_escape() {
        let (_, mut settings, _) = setup(Arc::new(MemoryStore::new())).await;

        assert!(!settings.is_open());
        assert!(!settings.handle_escape());

        settings.open();
        assert!(settings.is_open());
        assert!(settings.handle_escape());
        assert!(!settings.is_open());
    }

    // ==================== Save Tests ====================

    #[tokio::test]
    async fn test_save_switches_language_and_persists_instrument() {
        let store = Arc::new(MemoryStore::new());
        let (mut translator, mut settings, bus) = setup(store.clone()).await;
        let mut events = bus.subscribe();
        settings.open();

        settings
            .save(
                &mut translator,
                SettingsForm {
                    language: Some(Language::HAWAIIAN),
                    instrument: Some(Instrument::AcousticBass),
                },
            )
            .await;

        assert!(!settings.is_open());
        assert_eq!(translator.current_language(), Language::HAWAIIAN);
        assert_eq!(settings.current_language(), Language::HAWAIIAN);
        assert_eq!(settings.primary_instrument(), Instrument::AcousticBass);
        assert_eq!(store.get(LANGUAGE_KEY).unwrap().as_deref(), Some("haw"));
        assert_eq!(
            store.get(INSTRUMENT_KEY).unwrap().as_deref(),
            Some("acousticBass")
        );
        assert_eq!(
            events.try_recv().unwrap(),
            AppEvent::LanguageChanged {
                language: Language::HAWAIIAN
            }
        );
        assert_eq!(
            events.try_recv().unwrap(),
            AppEvent::InstrumentChanged {
                instrument: Instrument::AcousticBass
            }
        );
        assert_eq!(settings.view().title, "Nā Hoʻonohonoho");
    }

    #[tokio::test]
    async fn test_save_same_language_does_not_reload() {
        let store = Arc::new(MemoryStore::new());
        let (mut translator, mut settings, bus) = setup(store.clone()).await;
        let mut events = bus.subscribe();

        settings
            .save(
                &mut translator,
                SettingsForm {
                    language: Some(Language::ENGLISH),
                    instrument: None,
                },
            )
            .await;

        assert_eq!(store.get(LANGUAGE_KEY).unwrap(), None);
        assert_eq!(store.get(INSTRUMENT_KEY).unwrap(), None);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_save_previous_language_after_external_switch() {
        let store = Arc::new(MemoryStore::new());
        let (mut translator, mut settings, _) = setup(store.clone()).await;

        // Switched by another caller; settings has not synced yet
        translator.set_language("haw").await.unwrap();

        settings
            .save(
                &mut translator,
                SettingsForm {
                    language: Some(Language::ENGLISH),
                    instrument: None,
                },
            )
            .await;

        assert_eq!(translator.current_language(), Language::ENGLISH);
        assert_eq!(settings.current_language(), Language::ENGLISH);
        assert_eq!(store.get(LANGUAGE_KEY).unwrap().as_deref(), Some("en"));
        assert_eq!(translator.t("a"), "A");
    }

    #[tokio::test]
    async fn test_save_current_language_after_external_switch_does_not_reload() {
        let store = Arc::new(MemoryStore::new());
        let (mut translator, mut settings, bus) = setup(store.clone()).await;
        translator.set_language("haw").await.unwrap();
        let mut events = bus.subscribe();

        settings
            .save(
                &mut translator,
                SettingsForm {
                    language: Some(Language::HAWAIIAN),
                    instrument: None,
                },
            )
            .await;

        assert_eq!(settings.current_language(), Language::HAWAIIAN);
        assert!(events.try_recv().is_err());
    }

    // ==================== Event Tests ====================

    #[tokio::test]
    async fn test_sync_events_follows_translator_language() {
        let (mut translator, mut settings, _) = setup(Arc::new(MemoryStore::new())).await;

        translator.set_language("haw").await.unwrap();
        assert_eq!(settings.current_language(), Language::ENGLISH);

        assert_eq!(settings.sync_events(), 1);
        assert_eq!(settings.current_language(), Language::HAWAIIAN);
        assert_eq!(settings.label("buttons.cancel"), "Hoʻōki");
    }

    #[tokio::test]
    async fn test_view_follows_external_switch_without_sync() {
        let store = Arc::new(MemoryStore::new());
        store.set(INSTRUMENT_KEY, "guitar").unwrap();
        let (mut translator, mut settings, _) = setup(store).await;
        assert_eq!(settings.view().title, "Settings");

        translator.set_language("haw").await.unwrap();
        let view = settings.view();

        assert_eq!(view.title, "Nā Hoʻonohonoho");
        assert_eq!(view.save_label, "Mālama");
        let checked: Vec<_> = view
            .language
            .options
            .iter()
            .filter(|o| o.checked)
            .map(|o| o.value)
            .collect();
        assert_eq!(checked, vec!["haw"]);
        assert_eq!(view.instrument.options[2].label, "Kīkā");
        assert!(view.instrument.options[2].checked);
        assert_eq!(settings.current_language(), Language::HAWAIIAN);
    }
}
