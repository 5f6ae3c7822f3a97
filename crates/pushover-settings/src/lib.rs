//! # pushover-settings
//!
//! Layered configuration for the Pushover client.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`PushoverSettings::default()`]
//! 2. **User file**: `~/.pushover/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `PUSHOVER_*` overrides
//!
//! Command-line flags are applied on top by the binary.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    apply_env_overrides, deep_merge, load_required_settings, load_required_settings_with_env,
    load_settings, load_settings_from_path, load_settings_with_env, settings_path,
};
pub use types::*;
