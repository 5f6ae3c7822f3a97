//! # pushover-client
//!
//! Delivers notifications to the Pushover API.
//!
//! - [`Transport`]: one HTTP exchange (POST a form, return status + body)
//! - [`ReqwestTransport`]: the production transport
//! - [`Client`]: application token, API base URL and a swappable transport
//! - [`dispatch`](dispatch::dispatch): the retry controller
//!
//! ```no_run
//! # async fn demo() -> Result<(), pushover_core::DispatchError> {
//! use pushover_client::Client;
//! use pushover_core::{Message, RetryPolicy};
//! use tokio_util::sync::CancellationToken;
//!
//! let client = Client::new("app-token");
//! let message = Message::new("user-key", "backup finished").with_title("nightly");
//! let receipt = client
//!     .dispatch(&message.into(), RetryPolicy::default(), &CancellationToken::new())
//!     .await?;
//! println!("delivered after {} attempt(s)", receipt.attempts);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

pub mod client;
pub mod dispatch;
pub mod transport;

pub use client::Client;
pub use transport::{RawResponse, ReqwestTransport, Transport, TransportError, WireRequest};
