//! Response classifier: HTTP status + body → outcome.
//!
//! The service signals acceptance two ways, an HTTP status and a numeric
//! `status` flag in the JSON body, and the two do not always agree. Both
//! are consulted:
//!
//! 1. Success iff HTTP 200 and the JSON `status` is present and equal to 1.
//! 2. Fatal iff HTTP 4xx, or the JSON `status` is present and equal to 0.
//! 3. Temporary otherwise (5xx, gateway pages, unparseable bodies).
//!
//! A body that is not a JSON object is not an error in itself; it only
//! means the `status` flag is absent.

use serde_json::Value;

use crate::errors::{DispatchError, Outcome};

/// Proof of delivery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    /// HTTP status of the accepting response.
    pub status: u16,
    /// Request id assigned by the service, if it sent one.
    pub request: Option<String>,
    /// Number of wire attempts the dispatch took.
    pub attempts: u32,
}

/// Fields of interest in a service response body.
#[derive(Debug, Default)]
struct ResponseBody {
    status: Option<f64>,
    request: Option<String>,
    errors: Vec<String>,
}

impl ResponseBody {
    fn parse(body: &[u8]) -> Self {
        let Ok(Value::Object(obj)) = serde_json::from_slice::<Value>(body) else {
            return Self::default();
        };
        Self {
            status: obj.get("status").and_then(Value::as_f64),
            request: obj.get("request").and_then(Value::as_str).map(String::from),
            errors: obj
                .get("errors")
                .and_then(Value::as_array)
                .map(|list| {
                    list.iter()
                        .filter_map(Value::as_str)
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    #[allow(clippy::float_cmp)]
    fn status_is(&self, expected: f64) -> bool {
        self.status == Some(expected)
    }
}

/// Classify one HTTP exchange.
pub fn classify(status: u16, body: &[u8]) -> Outcome {
    let parsed = ResponseBody::parse(body);

    if status == 200 && parsed.status_is(1.0) {
        return Ok(Receipt {
            status,
            request: parsed.request,
            attempts: 1,
        });
    }

    let message = error_message(&parsed, body);
    if status / 100 == 4 || parsed.status_is(0.0) {
        Err(DispatchError::Fatal {
            status: Some(status),
            message,
        })
    } else {
        Err(DispatchError::Temporary {
            status: Some(status),
            message,
        })
    }
}

fn error_message(parsed: &ResponseBody, body: &[u8]) -> String {
    if !parsed.errors.is_empty() {
        return parsed.errors.join("; ");
    }
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        "empty response body".to_string()
    } else {
        text.to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn ok_with_status_one_is_success() {
        let receipt = classify(200, br#"{"status":1,"request":"abc-123"}"#).unwrap();
        assert_eq!(receipt.status, 200);
        assert_eq!(receipt.request.as_deref(), Some("abc-123"));
        assert_eq!(receipt.attempts, 1);
    }

    #[test]
    fn float_status_one_is_success() {
        assert!(classify(200, br#"{"status":1.0}"#).is_ok());
    }

    #[test]
    fn client_error_is_fatal_regardless_of_body() {
        for body in [
            &br#"{"status":1}"#[..],
            br#"{"status":0}"#,
            b"<html>bad request</html>",
            b"",
        ] {
            assert_matches!(
                classify(400, body),
                Err(DispatchError::Fatal { status: Some(400), .. })
            );
        }
        assert_matches!(classify(429, b""), Err(DispatchError::Fatal { .. }));
    }

    #[test]
    fn server_error_overrides_json_status() {
        assert_matches!(
            classify(500, br#"{"status":1}"#),
            Err(DispatchError::Temporary { status: Some(500), .. })
        );
    }

    #[test]
    fn ok_with_status_zero_is_fatal() {
        assert_matches!(
            classify(200, br#"{"status":0}"#),
            Err(DispatchError::Fatal { status: Some(200), .. })
        );
    }

    #[test]
    fn server_error_with_status_zero_is_fatal() {
        assert_matches!(
            classify(500, br#"{"status":0}"#),
            Err(DispatchError::Fatal { .. })
        );
    }

    #[test]
    fn ok_without_json_is_temporary() {
        assert_matches!(
            classify(200, b"<html>gateway</html>"),
            Err(DispatchError::Temporary { status: Some(200), .. })
        );
        assert_matches!(classify(200, b"{}"), Err(DispatchError::Temporary { .. }));
        assert_matches!(classify(200, b"[1]"), Err(DispatchError::Temporary { .. }));
    }

    #[test]
    fn non_numeric_status_counts_as_absent() {
        assert_matches!(
            classify(200, br#"{"status":"1"}"#),
            Err(DispatchError::Temporary { .. })
        );
    }

    #[test]
    fn gateway_errors_are_temporary() {
        for code in [502, 503, 504] {
            assert_matches!(classify(code, b"Bad Gateway"), Err(DispatchError::Temporary { .. }));
        }
    }

    #[test]
    fn redirect_is_temporary() {
        assert_matches!(classify(302, b""), Err(DispatchError::Temporary { .. }));
    }

    #[test]
    fn error_message_prefers_service_errors() {
        let body = br#"{"user":"invalid","errors":["user identifier is invalid","token is invalid"],"status":0}"#;
        let err = classify(400, body).unwrap_err();
        assert_eq!(err.message(), "user identifier is invalid; token is invalid");
        assert_eq!(
            err.to_string(),
            "400: user identifier is invalid; token is invalid"
        );
    }

    #[test]
    fn error_message_falls_back_to_body() {
        let err = classify(503, b"  Service Unavailable\n").unwrap_err();
        assert_eq!(err.message(), "Service Unavailable");
    }

    #[test]
    fn error_message_for_empty_body() {
        let err = classify(500, b"").unwrap_err();
        assert_eq!(err.message(), "empty response body");
    }
}
