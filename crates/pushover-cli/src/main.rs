//! # pushover
//!
//! Command-line client: loads settings, merges flags over them and
//! dispatches one message or glance update with retries. Ctrl-C cancels
//! the dispatch. Exits non-zero when delivery fails.

#![deny(unsafe_code)]

mod args;

use anyhow::{Context, Result};
use clap::Parser;
use pushover_client::Client;
use pushover_core::logging::{DEFAULT_LEVEL, init_subscriber};
use tokio_util::sync::CancellationToken;

use crate::args::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging comes up before settings so that load-time warnings are seen;
    // the configured level is applied once settings are known.
    let logs = init_subscriber(cli.log_level.as_deref().unwrap_or(DEFAULT_LEVEL));
    let settings = cli.load_settings()?;
    let _ = logs.set_level(cli.log_level(&settings));

    let invocation = cli.resolve(&settings)?;
    let endpoint = invocation.notification.endpoint();
    let client = Client::new(invocation.token).with_base_url(invocation.base_url);

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupted, cancelling dispatch");
                cancel.cancel();
            }
        })
    };

    let outcome = client
        .dispatch(&invocation.notification, invocation.policy, &cancel)
        .await;
    interrupt.abort();

    let receipt = outcome.with_context(|| format!("{endpoint} delivery failed"))?;
    tracing::info!(
        request = receipt.request.as_deref().unwrap_or(""),
        attempts = receipt.attempts,
        "done"
    );
    Ok(())
}
