//! API endpoint, credential and per-recipient defaults.

use std::fmt;

use pushover_core::constants::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};

/// Where and as which application to talk to the API.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSettings {
    /// API base URL. The endpoint paths are appended to it.
    pub base_url: String,
    /// Application token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
        }
    }
}

impl fmt::Debug for ApiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiSettings")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Values used when the command line leaves them out.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct DefaultSettings {
    /// Recipient user or group key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Device name, or several separated by commas.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    /// Message or glance title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl DefaultSettings {
    /// Configured device names, split on commas with blanks dropped.
    pub fn devices(&self) -> Vec<String> {
        self.device
            .as_deref()
            .map(|d| {
                d.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}
