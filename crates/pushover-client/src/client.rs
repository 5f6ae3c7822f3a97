//! Client handle: application token, API base URL and transport.
//!
//! The token and base URL are fixed at construction. The transport sits
//! behind a reader/writer lock so it can be replaced while other tasks are
//! dispatching through the same client; each attempt clones the current
//! handle once and a swap never tears an in-flight read.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use pushover_core::constants::DEFAULT_BASE_URL;
use pushover_core::{Message, Notification, Outcome, RetryPolicy};
use tokio_util::sync::CancellationToken;

use crate::dispatch;
use crate::transport::{ReqwestTransport, Transport};

/// Pushover API client.
pub struct Client {
    token: String,
    base_url: String,
    transport: RwLock<Arc<dyn Transport>>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Client for the production API using the default reqwest transport.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_transport(token, Arc::new(ReqwestTransport::new()))
    }

    /// Client using a caller-supplied transport.
    pub fn with_transport(token: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            transport: RwLock::new(transport),
        }
    }

    /// Point the client at another API base URL.
    ///
    /// The URL is validated when a notification is dispatched; an unusable
    /// URL fails every dispatch as fatal before any attempt is made.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace the transport used by subsequent attempts.
    pub fn set_transport(&self, transport: Arc<dyn Transport>) {
        *self.transport.write() = transport;
    }

    /// Current transport handle.
    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport.read())
    }

    /// API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn token(&self) -> &str {
        &self.token
    }

    /// Deliver `notification`, retrying temporary failures per `policy`
    /// until it succeeds, fails fatally, runs out of attempts, or `cancel`
    /// fires.
    pub async fn dispatch(
        &self,
        notification: &Notification,
        policy: RetryPolicy,
        cancel: &CancellationToken,
    ) -> Outcome {
        dispatch::dispatch(self, notification, policy, cancel).await
    }

    /// Deliver `notification` with a single attempt and no retries.
    pub async fn send(&self, notification: &Notification) -> Outcome {
        self.dispatch(notification, RetryPolicy::once(), &CancellationToken::new())
            .await
    }

    /// Send a plain message to `user` with a single attempt.
    pub async fn send_message(&self, user: &str, message: &str) -> Outcome {
        self.send(&Message::new(user, message).into()).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
