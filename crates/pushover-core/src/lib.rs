//! # pushover-core
//!
//! Foundation types and pure logic for the Pushover dispatch pipeline.
//!
//! - **Notifications**: [`Message`], [`Glance`] and the [`Notification`] enum
//!   that routes either one to its endpoint
//! - **Encoding**: [`encode`] turns a notification into [`FormParams`]
//! - **Classification**: [`classify`] maps status code + body to an outcome
//! - **Errors**: [`DispatchError`] with its Fatal / Temporary split
//! - **Retry policy**: [`RetryPolicy`] (attempt cap and fixed delay)
//!
//! Nothing in this crate performs I/O. The HTTP transport and the retry
//! loop live in `pushover-client`.

#![deny(unsafe_code)]

pub mod classify;
pub mod constants;
pub mod encode;
pub mod errors;
pub mod glance;
pub mod logging;
pub mod message;
pub mod notification;
pub mod retry;

pub use classify::{Receipt, classify};
pub use encode::{FormParams, encode};
pub use errors::{DispatchError, Outcome};
pub use glance::{Glance, GlanceField};
pub use message::{Message, ParsePriorityError, Priority, Sound};
pub use notification::{Endpoint, EndpointError, Notification};
pub use retry::RetryPolicy;
