//! Validate every translation bundle in the bundle directory
//!
//! Usage:
//!   cargo run --bin check-bundles
//!   cargo run --bin check-bundles -- path/to/bundles
//!
//! Exits non-zero when any bundle has errors. Warnings (missing Hawaiian
//! keys, placeholder mismatches) are printed but do not fail the check.

use anyhow::{bail, Context, Result};
use jemt4_i18n::config::Config;
use jemt4_i18n::i18n::{BundleSource, BundleValidator, DirBundleSource};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("jemt4_i18n=info".parse()?),
        )
        .init();

    let dir = match std::env::args().nth(1) {
        Some(dir) => dir.into(),
        None => Config::from_env()?.bundle_dir,
    };
    let source = DirBundleSource::new(dir);

    let names = source
        .bundle_names()
        .await
        .with_context(|| format!("Failed to list bundles in {}", source.dir().display()))?;
    info!("Checking {} bundle(s) in {}", names.len(), source.dir().display());

    let mut failed = 0;
    for name in &names {
        let document = match source.fetch(name).await {
            Ok(document) => document,
            Err(e) => {
                println!("✗ {}: {}", name, e);
                failed += 1;
                continue;
            }
        };

        let report = BundleValidator::validate(name, &document);
        for error in &report.errors {
            println!("  error: {}", error);
        }
        for warning in &report.warnings {
            println!("  warning: {}", warning);
        }

        if report.has_errors() {
            println!("✗ {}", name);
            failed += 1;
        } else {
            println!("✓ {} ({} warning(s))", name, report.warnings.len());
        }
    }

    if failed > 0 {
        bail!("{} of {} bundle(s) failed validation", failed, names.len());
    }

    Ok(())
}
