#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::sync::{Arc, Mutex, OnceLock};

use anyhow::{Context, Result, ensure};

use crate::grade::options::CompareOptions;

/// Sequences at least this long only report their first divergence.
pub const DEFAULT_SEQUENCE_THRESHOLD: usize = 25;

/// Checker settings shared by every generated case.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckerConfig {
    /// Length from which sequence mismatches are localized to the first
    /// differing index instead of printing both sequences.
    sequence_threshold: usize,
    /// Options applied underneath each variable's own options.
    default_options:    CompareOptions,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            sequence_threshold: DEFAULT_SEQUENCE_THRESHOLD,
            default_options:    CompareOptions::default(),
        }
    }
}

impl CheckerConfig {
    /// Reads the configuration from the environment (and a `.env` file, if
    /// present).
    ///
    /// * `NBCHECK_SEQUENCE_THRESHOLD`: localization threshold, at least 1.
    /// * `NBCHECK_DEFAULT_REL`: default relative tolerance for floats.
    /// * `NBCHECK_DEFAULT_ABS`: default absolute tolerance for floats.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let sequence_threshold = match std::env::var("NBCHECK_SEQUENCE_THRESHOLD") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("NBCHECK_SEQUENCE_THRESHOLD is not a count: {raw:?}"))?,
            Err(_) => DEFAULT_SEQUENCE_THRESHOLD,
        };
        ensure!(sequence_threshold >= 1, "NBCHECK_SEQUENCE_THRESHOLD must be at least 1");

        let default_options = CompareOptions::builder()
            .maybe_rel(read_f64("NBCHECK_DEFAULT_REL")?)
            .maybe_abs(read_f64("NBCHECK_DEFAULT_ABS")?)
            .build();

        Ok(Self {
            sequence_threshold,
            default_options,
        })
    }

    /// Returns the localization threshold.
    pub fn sequence_threshold(&self) -> usize {
        self.sequence_threshold
    }

    /// Returns the default comparison options.
    pub fn default_options(&self) -> &CompareOptions {
        &self.default_options
    }

    /// Returns a new config with a custom localization threshold.
    pub fn with_sequence_threshold(mut self, threshold: usize) -> Self {
        self.sequence_threshold = threshold.max(1);
        self
    }

    /// Returns a new config with custom default options.
    pub fn with_default_options(mut self, options: CompareOptions) -> Self {
        self.default_options = options;
        self
    }
}

/// Parses an optional float environment variable.
fn read_f64(env: &str) -> Result<Option<f64>> {
    match std::env::var(env) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<f64>()
            .map(Some)
            .with_context(|| format!("{env} is not a number: {raw:?}")),
        _ => Ok(None),
    }
}

/// Global storage for the lazily constructed configuration.
static CONFIG_SLOT: OnceLock<Mutex<Option<Arc<CheckerConfig>>>> = OnceLock::new();

/// Returns the mutex guarding the global configuration slot.
fn slot() -> &'static Mutex<Option<Arc<CheckerConfig>>> {
    CONFIG_SLOT.get_or_init(|| Mutex::new(None))
}

/// Ensure the global configuration has been read from the environment and
/// return it.
pub fn ensure_initialized() -> Result<Arc<CheckerConfig>> {
    let mut guard = slot()
        .lock()
        .map_err(|_| anyhow::anyhow!("config slot poisoned"))?;
    if let Some(cfg) = guard.as_ref() {
        return Ok(Arc::clone(cfg));
    }

    let cfg = Arc::new(CheckerConfig::from_env()?);
    tracing::debug!(
        "Checker configuration loaded, sequence threshold {}",
        cfg.sequence_threshold
    );
    *guard = Some(Arc::clone(&cfg));
    Ok(cfg)
}

