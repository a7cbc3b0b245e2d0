//! Translate keys from the command line
//!
//! Usage:
//!   cargo run -- hero.heading navigation.home
//!   cargo run -- --lang haw hero.heading
//!   cargo run -- messages.welcome --params name=Kai
//!
//! Switching with `--lang` persists the choice, like the site's switcher.
//!
//! Optional environment variables:
//! - I18N_BASE_URL (fetch bundles over HTTP instead of from disk)
//! - I18N_BUNDLE_DIR (defaults to assets/i18n)
//! - I18N_BUNDLES (defaults to common,homepage)
//! - I18N_STORAGE_PATH (defaults to data/preferences.json)

use anyhow::{bail, Context, Result};
use jemt4_i18n::config::Config;
use jemt4_i18n::i18n::{Param, Translator};
use std::fmt::Display;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Default, PartialEq)]
struct Args {
    lang: Option<String>,
    keys: Vec<String>,
    params: Vec<(String, String)>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    let mut in_params = false;

    while let Some(arg) = args.next() {
        if arg == "--lang" {
            parsed.lang = Some(args.next().context("--lang needs a language code")?);
        } else if arg == "--params" {
            in_params = true;
        } else if in_params {
            let (name, value) = arg
                .split_once('=')
                .with_context(|| format!("Expected name=value, got '{}'", arg))?;
            parsed.params.push((name.to_string(), value.to_string()));
        } else {
            parsed.keys.push(arg);
        }
    }

    if parsed.keys.is_empty() {
        bail!("Usage: jemt4-i18n [--lang CODE] KEY... [--params name=value...]");
    }

    Ok(parsed)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("jemt4_i18n=info".parse()?),
        )
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    let config = Config::from_env()?;

    let store = Arc::new(config.open_store()?);
    let mut translator = Translator::new(config.bundle_source(), store, config.event_bus())
        .with_bundles(config.bundles.clone());
    translator.init().await;

    if let Some(code) = &args.lang {
        translator.set_language(code).await?;
    }

    info!("Translating {} key(s)", args.keys.len());

    let params: Vec<Param<'_>> = args
        .params
        .iter()
        .map(|(name, value)| (name.as_str(), value as &dyn Display))
        .collect();

    for key in &args.keys {
        println!("{}", translator.translate(key, &params));
    }

    let report = translator.metrics();
    info!(
        "Lookups: {}, misses: {}, bundle fetches: {}",
        report.lookups, report.misses, report.bundle_fetches
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_keys_only() {
        let parsed = parse_args(args(&["hero.heading", "navigation.home"])).unwrap();
        assert_eq!(parsed.keys, vec!["hero.heading", "navigation.home"]);
        assert_eq!(parsed.lang, None);
        assert!(parsed.params.is_empty());
    }

    #[test]
    fn test_parse_lang_and_params() {
        let parsed = parse_args(args(&[
            "--lang",
            "haw",
            "messages.welcome",
            "--params",
            "name=Kai",
            "count=3",
        ]))
        .unwrap();

        assert_eq!(parsed.lang.as_deref(), Some("haw"));
        assert_eq!(parsed.keys, vec!["messages.welcome"]);
        assert_eq!(
            parsed.params,
            vec![
                ("name".to_string(), "Kai".to_string()),
                ("count".to_string(), "3".to_string())
            ]
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(args(&[])).is_err());
        assert!(parse_args(args(&["--lang"])).is_err());
        assert!(parse_args(args(&["key", "--params", "broken"])).is_err());
    }
}
