//! Runtime configuration for analysis runs.
//!
//! Centralizes the tunable values and their defaults. Environment overrides
//! are optional; [`AnalysisConfig::default`] is what every test and most
//! callers use.

use anyhow::{Result, anyhow};
use std::env;

/// Parse an optional environment variable with a default value.
macro_rules! parse_env {
    ($var_name:expr, $ty:ty, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Tunables for one analysis run.
#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    /// Sliding-window capacity for region averages.
    pub window_size: usize,
    /// Trailing window, in minutes, for multi-sensor period detection.
    pub period_window_minutes: i64,
    /// Number of partitions to plan (one Local Aggregator invocation each).
    pub partitions: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_size: 50,
            period_window_minutes: 10,
            partitions: 2 * num_cpus::get().max(2),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults above.
    ///
    /// Recognized variables:
    /// - `STRATUS_WINDOW_SIZE`
    /// - `STRATUS_PERIOD_WINDOW_MINUTES`
    /// - `STRATUS_PARTITIONS`
    ///
    /// # Errors
    /// Returns an error if a set variable fails to parse.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            window_size: parse_env!("STRATUS_WINDOW_SIZE", usize, defaults.window_size),
            period_window_minutes: parse_env!(
                "STRATUS_PERIOD_WINDOW_MINUTES",
                i64,
                defaults.period_window_minutes
            ),
            partitions: parse_env!("STRATUS_PARTITIONS", usize, defaults.partitions),
        })
    }
}
