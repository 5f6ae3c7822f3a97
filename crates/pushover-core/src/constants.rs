//! Package-level constants.

use std::time::Duration;

/// Current version of the client (sourced from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Value of the `User-Agent` header sent with every request.
pub const USER_AGENT: &str = concat!("pushover-rs/", env!("CARGO_PKG_VERSION"));

/// Production API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.pushover.net";

/// Path of the message delivery endpoint, relative to the base URL.
pub const MESSAGES_PATH: &str = "/1/messages.json";

/// Path of the glance update endpoint, relative to the base URL.
pub const GLANCES_PATH: &str = "/1/glances.json";

/// Content type of every request body.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Fixed wait between attempts after a temporary failure.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Attempt cap used when nothing else is configured. `0` means unlimited.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_agent_carries_version() {
        assert!(USER_AGENT.starts_with("pushover-rs/"));
        assert!(USER_AGENT.ends_with(VERSION));
    }

    #[test]
    fn endpoint_paths_are_absolute() {
        assert!(MESSAGES_PATH.starts_with('/'));
        assert!(GLANCES_PATH.starts_with('/'));
    }

    #[test]
    fn default_delay_is_five_seconds() {
        assert_eq!(DEFAULT_RETRY_DELAY.as_secs(), 5);
    }
}
