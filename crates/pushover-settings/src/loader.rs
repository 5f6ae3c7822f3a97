//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`PushoverSettings::default()`]
//! 2. If `~/.pushover/settings.json` exists, deep-merge it over the defaults
//!    (a file named explicitly through [`load_required_settings`] must exist)
//! 3. Apply `PUSHOVER_*` environment overrides
//! 4. Validate the result
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{Result, SettingsError};
use crate::types::{MAX_RETRY_DELAY_MS, PushoverSettings, parse_log_level};

/// Application token.
pub const ENV_APP: &str = "PUSHOVER_APP";
/// Default recipient key.
pub const ENV_USER: &str = "PUSHOVER_USER";
/// Default device list.
pub const ENV_DEVICE: &str = "PUSHOVER_DEVICE";
/// Default title.
pub const ENV_TITLE: &str = "PUSHOVER_TITLE";
/// API base URL.
pub const ENV_BASE_URL: &str = "PUSHOVER_BASE_URL";
/// Attempt cap, 0 for unlimited.
pub const ENV_MAX_ATTEMPTS: &str = "PUSHOVER_MAX_ATTEMPTS";
/// Delay between attempts in milliseconds.
pub const ENV_RETRY_DELAY_MS: &str = "PUSHOVER_RETRY_DELAY_MS";
/// Log level.
pub const ENV_LOG_LEVEL: &str = "PUSHOVER_LOG_LEVEL";

/// Resolve the path to the settings file (`~/.pushover/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".pushover").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<PushoverSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// A missing file yields defaults; a file with invalid JSON is an error.
pub fn load_settings_from_path(path: &Path) -> Result<PushoverSettings> {
    load_settings_with_env(path, |name| std::env::var(name).ok())
}

/// Like [`load_settings_from_path`], reading variables through `lookup`.
pub fn load_settings_with_env<F>(path: &Path, lookup: F) -> Result<PushoverSettings>
where
    F: Fn(&str) -> Option<String>,
{
    load(path, false, lookup)
}

/// Load settings from a file the user named explicitly.
///
/// Unlike [`load_settings_from_path`], a missing file is an error.
pub fn load_required_settings(path: &Path) -> Result<PushoverSettings> {
    load_required_settings_with_env(path, |name| std::env::var(name).ok())
}

/// Like [`load_required_settings`], reading variables through `lookup`.
pub fn load_required_settings_with_env<F>(path: &Path, lookup: F) -> Result<PushoverSettings>
where
    F: Fn(&str) -> Option<String>,
{
    load(path, true, lookup)
}

fn load<F>(path: &Path, required: bool, lookup: F) -> Result<PushoverSettings>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = serde_json::to_value(PushoverSettings::default())?;

    let merged = if required || path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: PushoverSettings = serde_json::from_value(merged)?;
    apply_env_overrides_with(&mut settings, lookup);
    settings.validate()?;
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `PUSHOVER_*` overrides from the process environment.
pub fn apply_env_overrides(settings: &mut PushoverSettings) {
    apply_env_overrides_with(settings, |name| std::env::var(name).ok());
}

/// Apply overrides read through `lookup`.
///
/// Empty values are ignored. Values that do not parse are logged and
/// ignored, leaving the file or default value in place.
pub fn apply_env_overrides_with<F>(settings: &mut PushoverSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(v) = read(ENV_APP) {
        settings.api.token = Some(v);
    }
    if let Some(v) = read(ENV_BASE_URL) {
        settings.api.base_url = v;
    }
    if let Some(v) = read(ENV_USER) {
        settings.defaults.user = Some(v);
    }
    if let Some(v) = read(ENV_DEVICE) {
        settings.defaults.device = Some(v);
    }
    if let Some(v) = read(ENV_TITLE) {
        settings.defaults.title = Some(v);
    }

    if let Some(raw) = read(ENV_MAX_ATTEMPTS) {
        match parse_u32_range(&raw, 0, u32::MAX) {
            Some(v) => settings.retry.max_attempts = v,
            None => warn!(key = ENV_MAX_ATTEMPTS, value = %raw, "invalid u32 env var, ignoring"),
        }
    }
    if let Some(raw) = read(ENV_RETRY_DELAY_MS) {
        match parse_u64_range(&raw, 0, MAX_RETRY_DELAY_MS) {
            Some(v) => settings.retry.delay_ms = v,
            None => warn!(key = ENV_RETRY_DELAY_MS, value = %raw, "invalid u64 env var, ignoring"),
        }
    }
    if let Some(raw) = read(ENV_LOG_LEVEL) {
        match parse_log_level(&raw) {
            Some(v) => settings.logging.level = v,
            None => warn!(key = ENV_LOG_LEVEL, value = %raw, "invalid log level env var, ignoring"),
        }
    }
}

// ── Pure parsing functions ──────────────────────────────────────────────────

/// Parse a string as a `u32` within a range.
pub fn parse_u32_range(val: &str, min: u32, max: u32) -> Option<u32> {
    let n: u32 = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
