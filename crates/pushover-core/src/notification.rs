//! The two kinds of notification and the endpoint each one goes to.

use std::fmt;

use url::Url;

use crate::constants::{GLANCES_PATH, MESSAGES_PATH};
use crate::glance::Glance;
use crate::message::Message;

/// Service endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `/1/messages.json`.
    Messages,
    /// `/1/glances.json`.
    Glances,
}

impl Endpoint {
    /// Path relative to the API base URL.
    pub fn path(self) -> &'static str {
        match self {
            Self::Messages => MESSAGES_PATH,
            Self::Glances => GLANCES_PATH,
        }
    }

    /// Absolute URL of this endpoint under `base_url`.
    ///
    /// Only `http` and `https` bases are accepted.
    pub fn resolve(self, base_url: &str) -> Result<Url, EndpointError> {
        let base = Url::parse(base_url).map_err(|e| EndpointError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(EndpointError::UnsupportedScheme {
                scheme: base.scheme().to_string(),
            });
        }
        base.join(self.path())
            .map_err(|e| EndpointError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: e.to_string(),
            })
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Messages => write!(f, "messages"),
            Self::Glances => write!(f, "glances"),
        }
    }
}

/// A base URL that cannot address the service.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EndpointError {
    /// The base URL does not parse.
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The configured base URL.
        url: String,
        /// Parser message.
        reason: String,
    },
    /// The base URL is not HTTP(S).
    #[error("unsupported API URL scheme '{scheme}'")]
    UnsupportedScheme {
        /// The rejected scheme.
        scheme: String,
    },
}

/// Anything the client can deliver.
#[derive(Clone, Debug, PartialEq)]
pub enum Notification {
    /// A one-shot push message.
    Message(Message),
    /// A glance status update.
    Glance(Glance),
}

impl Notification {
    /// Endpoint this notification is posted to.
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::Message(_) => Endpoint::Messages,
            Self::Glance(_) => Endpoint::Glances,
        }
    }

    /// Recipient key.
    pub fn user(&self) -> &str {
        match self {
            Self::Message(m) => &m.user,
            Self::Glance(g) => &g.user,
        }
    }
}

impl From<Message> for Notification {
    fn from(message: Message) -> Self {
        Self::Message(message)
    }
}

impl From<Glance> for Notification {
    fn from(glance: Glance) -> Self {
        Self::Glance(glance)
    }
}
