pub mod config;
pub mod dom;
pub mod error;
pub mod events;
pub mod i18n;
pub mod settings;
pub mod storage;
