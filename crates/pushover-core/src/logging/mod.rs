//! Structured logging with `tracing`.
//!
//! Library code only emits events; the binary decides where they go by
//! calling [`init_subscriber`] once at startup. The application token is
//! never recorded as a field.

pub mod test_utils;

pub use test_utils::{CapturedEvent, CapturedLogs, capture_logs};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, reload};

/// Default filter when neither `RUST_LOG` nor a configured level is given.
pub const DEFAULT_LEVEL: &str = "warn";

/// Changes the level of the subscriber installed by [`init_subscriber`].
///
/// Inert when `RUST_LOG` chose the filter or another subscriber was
/// already installed.
#[derive(Clone, Debug, Default)]
pub struct LogHandle {
    filter: Option<reload::Handle<EnvFilter, Registry>>,
}

impl LogHandle {
    /// Switch to `level`. Returns whether the filter changed.
    pub fn set_level(&self, level: &str) -> bool {
        let Some(handle) = &self.filter else {
            return false;
        };
        match EnvFilter::try_new(level) {
            Ok(filter) => handle.reload(filter).is_ok(),
            Err(e) => {
                tracing::warn!(level, error = %e, "ignoring unusable log level");
                false
            }
        }
    }
}

/// Initialize the global tracing subscriber with stderr output.
///
/// `RUST_LOG` takes precedence over `level`. Subsequent calls are no-ops
/// and return an inert handle.
pub fn init_subscriber(level: &str) -> LogHandle {
    let from_env = EnvFilter::try_from_default_env().ok();
    let env_chosen = from_env.is_some();
    let filter = from_env
        .or_else(|| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LEVEL));
    let (filter, handle) = reload::Layer::new(filter);

    let fmt = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    // try_init fails if a global subscriber is already set
    if tracing_subscriber::registry()
        .with(filter)
        .with(fmt)
        .try_init()
        .is_err()
    {
        return LogHandle::default();
    }

    LogHandle {
        filter: (!env_chosen).then_some(handle),
    }
}
