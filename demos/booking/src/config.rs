//! Configuration for the booking demo.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;

/// Log filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "booking=info,mediator_runtime=info";

/// Demo configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// `tracing` filter directive (`RUST_LOG`)
    pub log_filter: String,
    /// Record request metrics and print them on exit (`BOOKING_METRICS_ENABLED`)
    pub metrics_enabled: bool,
    /// Start with the sample bookings (`BOOKING_SEED_DEMO_DATA`)
    pub seed_demo_data: bool,
    /// Warn about reversed stay dates (`BOOKING_DATE_VALIDATION`)
    pub date_validation: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            metrics_enabled: false,
            seed_demo_data: true,
            date_validation: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let flag = |key: &str, default: bool| {
            lookup(key)
                .and_then(|value| parse_flag(&value))
                .unwrap_or(default)
        };

        Self {
            log_filter: lookup("RUST_LOG")
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(defaults.log_filter),
            metrics_enabled: flag("BOOKING_METRICS_ENABLED", defaults.metrics_enabled),
            seed_demo_data: flag("BOOKING_SEED_DEMO_DATA", defaults.seed_demo_data),
            date_validation: flag("BOOKING_DATE_VALIDATION", defaults.date_validation),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
