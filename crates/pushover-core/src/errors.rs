//! Dispatch outcome and error taxonomy.
//!
//! Every failure the pipeline produces is already classified:
//!
//! - [`DispatchError::Fatal`]: the request was rejected for a reason that
//!   retrying cannot fix (bad token or user key, malformed request,
//!   explicit service rejection, unusable configuration)
//! - [`DispatchError::Temporary`]: the service or the network failed in a
//!   way that may clear up (5xx, ambiguous body, connection failure,
//!   cancellation)
//!
//! Only the retry controller decides whether a temporary error is retried
//! or handed back to the caller.

use thiserror::Error;

use crate::classify::Receipt;

/// Result of one dispatch.
pub type Outcome = Result<Receipt, DispatchError>;

/// Why a notification was not delivered.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Not retryable.
    #[error("{}", describe(.status, .message))]
    Fatal {
        /// HTTP status, when a response was received.
        status: Option<u16>,
        /// Diagnostic message.
        message: String,
    },
    /// Retryable.
    #[error("{}", describe(.status, .message))]
    Temporary {
        /// HTTP status, when a response was received.
        status: Option<u16>,
        /// Diagnostic message.
        message: String,
    },
}

#[allow(clippy::ref_option)]
fn describe(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("{code}: {message}"),
        None => message.to_string(),
    }
}

impl DispatchError {
    /// Fatal error without an HTTP status.
    pub fn fatal(message: impl Into<String>) -> Self {
        Self::Fatal {
            status: None,
            message: message.into(),
        }
    }

    /// Temporary error without an HTTP status.
    pub fn temporary(message: impl Into<String>) -> Self {
        Self::Temporary {
            status: None,
            message: message.into(),
        }
    }

    /// Whether another attempt may succeed.
    pub fn is_temporary(&self) -> bool {
        matches!(self, Self::Temporary { .. })
    }

    /// Whether retrying is pointless.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal { .. })
    }

    /// HTTP status of the response that caused the error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Fatal { status, .. } | Self::Temporary { status, .. } => *status,
        }
    }

    /// Diagnostic message without the status prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Fatal { message, .. } | Self::Temporary { message, .. } => message,
        }
    }

    /// Short label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fatal { .. } => "fatal",
            Self::Temporary { .. } => "temporary",
        }
    }
}
