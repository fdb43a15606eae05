//! Engine settings.
//!
//! Defaults work without any environment. [`EngineSettings::from_env`] loads
//! a `.env` file if present and then reads:
//!
//! - `FIELDGATE_AUTOFILL_GRACE_MS` — autofill grace delay in milliseconds
//! - `FIELDGATE_AUTOFILL_MIN_GROWTH` — characters a single change must add,
//!   strictly more than this, to look like autofill
//! - `FIELDGATE_THRESHOLDS_FILE` — JSON overlay for [`ThresholdTable`]

pub mod thresholds;

use std::time::Duration;

use crate::error::ConfigError;

pub use thresholds::{LengthBounds, ThresholdTable};

pub const DEFAULT_AUTOFILL_GRACE: Duration = Duration::from_millis(1500);
pub const DEFAULT_AUTOFILL_MIN_GROWTH: usize = 2;

const ENV_GRACE_MS: &str = "FIELDGATE_AUTOFILL_GRACE_MS";
const ENV_MIN_GROWTH: &str = "FIELDGATE_AUTOFILL_MIN_GROWTH";
const ENV_THRESHOLDS_FILE: &str = "FIELDGATE_THRESHOLDS_FILE";

#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub autofill_grace: Duration,
    pub autofill_min_growth: usize,
    pub thresholds: ThresholdTable,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            autofill_grace: DEFAULT_AUTOFILL_GRACE,
            autofill_min_growth: DEFAULT_AUTOFILL_MIN_GROWTH,
            thresholds: ThresholdTable::default(),
        }
    }
}

impl EngineSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds settings from an arbitrary variable lookup. Unset variables
    /// keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(raw) = lookup(ENV_GRACE_MS) {
            let millis = parse_env(ENV_GRACE_MS, &raw)?;
            settings.autofill_grace = Duration::from_millis(millis);
        }

        if let Some(raw) = lookup(ENV_MIN_GROWTH) {
            settings.autofill_min_growth = parse_env(ENV_MIN_GROWTH, &raw)?;
        }

        if let Some(path) = lookup(ENV_THRESHOLDS_FILE) {
            settings.thresholds = ThresholdTable::from_path(path.trim())?;
        }

        log::debug!(
            "engine settings: grace={:?} min_growth={}",
            settings.autofill_grace,
            settings.autofill_min_growth
        );
        Ok(settings)
    }
}

fn parse_env<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        name,
        value: raw.to_string(),
    })
}
