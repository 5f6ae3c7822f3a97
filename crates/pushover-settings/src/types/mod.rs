//! Settings type definitions.
//!
//! Field names are camelCase on disk. Every section is `#[serde(default)]`
//! so a settings file only needs the keys it changes.

mod api;

pub use api::*;

use std::time::Duration;

use pushover_core::RetryPolicy;
use pushover_core::constants::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY};
use pushover_core::logging::DEFAULT_LEVEL;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Longest accepted wait between attempts (one hour).
pub const MAX_RETRY_DELAY_MS: u64 = 3_600_000;

/// Root settings type.
///
/// ```json
/// {
///   "api": { "token": "azGDORePK8gMaC0QOYAMyEEuzJnyUi" },
///   "defaults": { "user": "uQiRzpo4DXghDmr9QzzfQu27cmVRsG", "device": "phone" },
///   "retry": { "maxAttempts": 0, "delayMs": 10000 }
/// }
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PushoverSettings {
    /// API endpoint and application token.
    pub api: ApiSettings,
    /// Recipient defaults.
    pub defaults: DefaultSettings,
    /// Retry behaviour of the dispatcher.
    pub retry: RetrySettings,
    /// Log output.
    pub logging: LoggingSettings,
}

impl PushoverSettings {
    /// Reject values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(SettingsError::InvalidValue(
                "api.baseUrl must not be empty".to_string(),
            ));
        }
        if self.retry.delay_ms > MAX_RETRY_DELAY_MS {
            return Err(SettingsError::InvalidValue(format!(
                "retry.delayMs {} exceeds {MAX_RETRY_DELAY_MS}",
                self.retry.delay_ms
            )));
        }
        if parse_log_level(&self.logging.level).is_none() {
            return Err(SettingsError::InvalidValue(format!(
                "logging.level {:?} is not one of trace, debug, info, warn, error, off",
                self.logging.level
            )));
        }
        Ok(())
    }
}

/// Attempt cap and delay between attempts.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct RetrySettings {
    /// Maximum attempts per dispatch; 0 retries until success or cancel.
    pub max_attempts: u32,
    /// Milliseconds to wait after a temporary failure.
    pub delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay_ms: u64::try_from(DEFAULT_RETRY_DELAY.as_millis()).unwrap_or(5_000),
        }
    }
}

impl RetrySettings {
    /// The dispatcher policy these settings describe.
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.delay_ms))
    }
}

/// Log output settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Minimum level written to stderr. `RUST_LOG` takes precedence.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL.to_string(),
        }
    }
}

/// Normalize a level name, accepting any case.
pub fn parse_log_level(val: &str) -> Option<String> {
    let level = val.trim().to_ascii_lowercase();
    matches!(
        level.as_str(),
        "trace" | "debug" | "info" | "warn" | "error" | "off"
    )
    .then_some(level)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
