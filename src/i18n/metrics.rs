//! Lookup and bundle-loading metrics.
//!
//! Counters are owned by each `Translator` rather than kept in a global, so
//! separate translators (and tests) never observe each other's numbers.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters for translation lookups and bundle loads.
#[derive(Debug, Default)]
pub struct LookupMetrics {
    /// Number of `translate` / `resolve` calls
    lookups: AtomicUsize,

    /// Number of lookups whose key had no translation
    misses: AtomicUsize,

    /// Number of bundle fetch attempts (fallback re-fetches included)
    bundle_fetches: AtomicUsize,

    /// Number of bundles that contributed nothing to a load
    bundle_failures: AtomicUsize,

    /// Number of bundles merged from the fallback language
    fallback_merges: AtomicUsize,
}

impl LookupMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_lookup(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_bundle_fetch(&self) {
        self.bundle_fetches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_bundle_failure(&self) {
        self.bundle_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback_merge(&self) {
        self.fallback_merges.fetch_add(1, Ordering::Relaxed);
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn bundle_fetches(&self) -> usize {
        self.bundle_fetches.load(Ordering::Relaxed)
    }

    pub fn bundle_failures(&self) -> usize {
        self.bundle_failures.load(Ordering::Relaxed)
    }

    pub fn fallback_merges(&self) -> usize {
        self.fallback_merges.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let lookups = self.lookups();
        let misses = self.misses();
        let hit_rate = if lookups > 0 {
            ((lookups - misses) as f64 / lookups as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            lookups,
            misses,
            hit_rate,
            bundle_fetches: self.bundle_fetches(),
            bundle_failures: self.bundle_failures(),
            fallback_merges: self.fallback_merges(),
        }
    }
}

/// Snapshot of a translator's counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub lookups: usize,

    pub misses: usize,

    /// Share of lookups that found a translation, as a percentage (0-100)
    pub hit_rate: f64,

    pub bundle_fetches: usize,

    pub bundle_failures: usize,

    pub fallback_merges: usize,
}
