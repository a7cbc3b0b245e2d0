//! Process-wide notifications between the translator and settings.

use crate::i18n::Language;
use crate::settings::Instrument;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

/// Default number of undelivered events a slow subscriber may fall behind by.
pub const DEFAULT_CAPACITY: usize = 16;

/// A broadcast notification. Fire-and-forget: nobody acknowledges it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AppEvent {
    LanguageChanged { language: Language },
    InstrumentChanged { instrument: Instrument },
}

impl AppEvent {
    /// Event name as seen by page scripts.
    pub fn name(&self) -> &'static str {
        match self {
            AppEvent::LanguageChanged { .. } => "jemt4-language-changed",
            AppEvent::InstrumentChanged { .. } => "jemt4-primary-instrument-changed",
        }
    }
}

/// Cloneable handle to a broadcast channel with any number of subscribers.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// Send `event` to every current subscriber.
    ///
    /// Returns how many subscribers will see it; zero is not an error.
    pub fn publish(&self, event: AppEvent) -> usize {
        let name = event.name();
        match self.sender.send(event) {
            Ok(receivers) => {
                debug!("{} delivered to {} listener(s)", name, receivers);
                receivers
            }
            Err(_) => {
                debug!("{} dropped: no listeners", name);
                0
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
