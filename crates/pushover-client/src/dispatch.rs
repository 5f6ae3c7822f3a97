//! Retry controller: encode once, then attempt until a terminal outcome.
//!
//! ```text
//! Attempting ──success──▶ Ok(receipt)
//!     │ ──fatal────▶ Err(fatal)
//!     │ ──temporary, cap reached──▶ Err(temporary)
//!     └─temporary──▶ wait(delay) ──▶ Attempting
//! ```
//!
//! Cancellation is checked before every attempt and raced against both the
//! in-flight exchange and the wait, so a cancelled dispatch returns
//! promptly with a temporary error.

use pushover_core::{DispatchError, Notification, Outcome, RetryPolicy, classify, encode};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::Client;
use crate::transport::{Transport, WireRequest};

/// Deliver `notification` through `client` under `policy`.
///
/// An unusable base URL is reported as fatal before any attempt is counted.
pub async fn dispatch(
    client: &Client,
    notification: &Notification,
    policy: RetryPolicy,
    cancel: &CancellationToken,
) -> Outcome {
    let endpoint = notification.endpoint();
    let url = endpoint.resolve(client.base_url()).map_err(|e| {
        warn!(%endpoint, error = %e, "endpoint URL rejected");
        DispatchError::fatal(e.to_string())
    })?;
    let request = WireRequest::form(url, &encode(client.token(), notification));

    let mut attempt: u32 = 0;
    loop {
        if cancel.is_cancelled() {
            return Err(cancelled(attempt, None));
        }
        attempt = next_attempt(attempt);
        debug!(%endpoint, attempt, max_attempts = policy.max_attempts, "dispatch attempt");

        let transport = client.transport();
        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(cancelled(attempt, None)),
            result = attempt_once(transport.as_ref(), &request) => result,
        };

        let err = match result {
            Ok(mut receipt) => {
                receipt.attempts = attempt;
                info!(
                    %endpoint,
                    attempts = attempt,
                    request = receipt.request.as_deref().unwrap_or(""),
                    "notification delivered"
                );
                return Ok(receipt);
            }
            Err(err) if err.is_fatal() => {
                warn!(%endpoint, attempt, status = ?err.status(), error = %err, "delivery rejected");
                return Err(err);
            }
            Err(err) => err,
        };

        if !policy.allows_another(attempt) {
            warn!(%endpoint, attempts = attempt, error = %err, "giving up after temporary failures");
            return Err(err);
        }

        warn!(
            %endpoint,
            attempt,
            delay_ms = u64::try_from(policy.delay.as_millis()).unwrap_or(u64::MAX),
            status = ?err.status(),
            error = %err,
            "temporary failure, retrying"
        );

        tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(cancelled(attempt, Some(&err))),
            () = tokio::time::sleep(policy.delay) => {}
        }
    }
}

async fn attempt_once(transport: &dyn Transport, request: &WireRequest) -> Outcome {
    let response = transport.send(request).await?;
    classify(response.status, &response.body)
}

/// Unlimited policies can run past `u32::MAX` attempts; the count pins there.
fn next_attempt(attempt: u32) -> u32 {
    attempt.saturating_add(1)
}

fn cancelled(attempts: u32, last: Option<&DispatchError>) -> DispatchError {
    debug!(attempts, "dispatch cancelled");
    match last {
        Some(err) => DispatchError::temporary(format!(
            "cancelled after {attempts} attempt(s); last error: {err}"
        )),
        None => DispatchError::temporary(format!("cancelled after {attempts} attempt(s)")),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
