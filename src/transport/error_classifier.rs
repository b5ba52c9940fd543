//! # Transport Error Classification
//!
//! Maps a raw [`TransportFailure`] onto exactly one [`ErrorKind`]. Precedence, first
//! match wins:
//!
//! | Condition | Kind | Retryable |
//! |-----------|------|-----------|
//! | no response, client deadline elapsed | `TIMEOUT_ERROR` | yes |
//! | no response, any other reason | `NETWORK_ERROR` | yes |
//! | 401 / 403 | `AUTHENTICATION_ERROR` | no |
//! | 404 | `NOT_FOUND_ERROR` | no |
//! | 400 / 422 | `VALIDATION_ERROR` | no |
//! | 429 | `RATE_LIMIT_ERROR` | yes |
//! | 504 | `TIMEOUT_ERROR` | yes |
//! | any other status ≥ 500 | `SERVER_ERROR` | yes |
//! | anything else | `UNKNOWN_ERROR` | no |
//!
//! Gateway timeouts (504) count as timeouts, not server errors.

use serde_json::Value;
use tracing::debug;

use super::TransportFailure;
use crate::error::{BoxError, ErrorContext, ErrorKind, LegitmarkError};

/// Response headers that may carry the backend correlation id, checked in order
pub const REQUEST_ID_HEADERS: [&str; 3] = ["x-request-id", "x-amzn-requestid", "x-correlation-id"];

/// Classify a failed transport operation against `endpoint`
pub fn classify_failure(failure: TransportFailure, endpoint: &str) -> LegitmarkError {
    let (kind, message, suggestions, context) = match &failure {
        TransportFailure::NoResponse { timed_out, reason } => {
            let kind = if *timed_out {
                ErrorKind::TimeoutError
            } else {
                ErrorKind::NetworkError
            };
            let message = if *timed_out {
                format!("Request to {endpoint} timed out: {reason}")
            } else {
                format!("Network error calling {endpoint}: {reason}")
            };
            let context = ErrorContext {
                endpoint: Some(endpoint.to_string()),
                ..ErrorContext::default()
            };
            (kind, message, default_suggestions(kind), context)
        }
        TransportFailure::Response {
            status,
            body,
            headers,
        } => {
            let kind = kind_for_status(*status);
            let message = body
                .as_ref()
                .and_then(extract_message)
                .unwrap_or_else(|| default_message(kind, *status, endpoint));

            let mut suggestions = default_suggestions(kind);
            if kind == ErrorKind::ValidationError {
                let field_errors = body.as_ref().map(extract_field_errors).unwrap_or_default();
                if !field_errors.is_empty() {
                    suggestions = field_errors;
                }
            }

            let request_id = REQUEST_ID_HEADERS
                .iter()
                .find_map(|name| headers.get(*name).cloned());

            let mut context = ErrorContext {
                status_code: Some(*status),
                endpoint: Some(endpoint.to_string()),
                request_id,
                ..ErrorContext::default()
            };
            if let Some(body) = body {
                context
                    .details
                    .insert("response_body".to_string(), body.clone());
            }
            (kind, message, suggestions, context)
        }
    };

    debug!(
        endpoint = %endpoint,
        kind = %kind,
        status_code = ?failure.status_code(),
        "Classified transport failure"
    );

    LegitmarkError::new(kind, message)
        .with_suggestions(suggestions)
        .with_context(context)
        .with_cause(failure)
}

/// Classify an arbitrary boxed failure.
///
/// An error that already belongs to the taxonomy passes through unchanged. Raw
/// [`TransportFailure`]s and `reqwest` errors are classified; anything else becomes
/// `UNKNOWN_ERROR` with the original kept as cause.
pub fn classify_error(error: BoxError, endpoint: &str) -> LegitmarkError {
    let error = match error.downcast::<LegitmarkError>() {
        Ok(classified) => return *classified,
        Err(other) => other,
    };

    let error = match error.downcast::<TransportFailure>() {
        Ok(failure) => return classify_failure(*failure, endpoint),
        Err(other) => other,
    };

    match error.downcast::<reqwest::Error>() {
        Ok(reqwest_error) => {
            let failure = super::http::failure_from_reqwest(&reqwest_error);
            classify_failure(failure, endpoint)
        }
        Err(other) => LegitmarkError::new(
            ErrorKind::UnknownError,
            format!("Unexpected failure calling {endpoint}: {other}"),
        )
        .with_endpoint(endpoint)
        .with_boxed_cause(other),
    }
}

/// Kind for a received HTTP status (steps 3-9 of the precedence table)
pub fn kind_for_status(status: u16) -> ErrorKind {
    match status {
        401 | 403 => ErrorKind::AuthenticationError,
        404 => ErrorKind::NotFoundError,
        400 | 422 => ErrorKind::ValidationError,
        429 => ErrorKind::RateLimitError,
        504 => ErrorKind::TimeoutError,
        500.. => ErrorKind::ServerError,
        _ => ErrorKind::UnknownError,
    }
}

fn extract_message(body: &Value) -> Option<String> {
    body.pointer("/error/message")
        .or_else(|| body.get("message"))
        .or_else(|| body.get("error").filter(|e| e.is_string()))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn extract_field_errors(body: &Value) -> Vec<String> {
    body.pointer("/error/errors")
        .or_else(|| body.get("errors"))
        .and_then(Value::as_array)
        .map(|errors| {
            errors
                .iter()
                .filter_map(|entry| {
                    let message = entry.get("message").and_then(Value::as_str)?;
                    Some(match entry.get("code").and_then(Value::as_str) {
                        Some(code) => format!("{code}: {message}"),
                        None => message.to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn default_message(kind: ErrorKind, status: u16, endpoint: &str) -> String {
    match kind {
        ErrorKind::AuthenticationError => format!("Authentication failed for {endpoint} (HTTP {status})"),
        ErrorKind::NotFoundError => format!("Resource not found: {endpoint}"),
        ErrorKind::ValidationError => format!("Request to {endpoint} was rejected as invalid (HTTP {status})"),
        ErrorKind::RateLimitError => format!("Rate limit exceeded calling {endpoint}"),
        ErrorKind::TimeoutError => format!("Gateway timed out calling {endpoint}"),
        ErrorKind::ServerError => format!("Server error calling {endpoint} (HTTP {status})"),
        _ => format!("Unexpected HTTP {status} from {endpoint}"),
    }
}

fn default_suggestions(kind: ErrorKind) -> Vec<String> {
    let suggestions: &[&str] = match kind {
        ErrorKind::TimeoutError => &[
            "Retry the request",
            "Increase LEGITMARK_TIMEOUT_MS if timeouts persist",
        ],
        ErrorKind::NetworkError => &[
            "Check network connectivity",
            "Verify LEGITMARK_BASE_URL is reachable",
        ],
        ErrorKind::AuthenticationError => &[
            "Verify LEGITMARK_API_KEY is set and valid",
            "Confirm the key has access to this resource",
        ],
        ErrorKind::NotFoundError => &["Check that the identifier exists and belongs to your account"],
        ErrorKind::ValidationError => &["Review the request payload against the API documentation"],
        ErrorKind::RateLimitError => &["Reduce request rate or retry after a delay"],
        ErrorKind::ServerError => &["Retry the request; the service may be temporarily unavailable"],
        _ => &[],
    };
    suggestions.iter().map(|s| (*s).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_table() {
        let cases = [
            (400, ErrorKind::ValidationError, false),
            (401, ErrorKind::AuthenticationError, false),
            (403, ErrorKind::AuthenticationError, false),
            (404, ErrorKind::NotFoundError, false),
            (422, ErrorKind::ValidationError, false),
            (429, ErrorKind::RateLimitError, true),
            (500, ErrorKind::ServerError, true),
            (502, ErrorKind::ServerError, true),
            (503, ErrorKind::ServerError, true),
            (504, ErrorKind::TimeoutError, true),
            (599, ErrorKind::ServerError, true),
            (600, ErrorKind::ServerError, true),
            (999, ErrorKind::ServerError, true),
            (302, ErrorKind::UnknownError, false),
        ];

        for (status, kind, retryable) in cases {
            let error = classify_failure(TransportFailure::status(status, None), "/api/v2/sr");
            assert_eq!(error.kind(), kind, "status {status}");
            assert_eq!(error.is_retryable(), retryable, "status {status}");
            assert_eq!(error.status_code(), Some(status));
        }
    }

    #[test]
    fn test_no_response_timeout_precedes_network() {
        let timeout = classify_failure(TransportFailure::timeout("deadline elapsed"), "/x");
        assert_eq!(timeout.kind(), ErrorKind::TimeoutError);
        assert!(timeout.is_retryable());
        assert_eq!(timeout.status_code(), None);

        let network = classify_failure(TransportFailure::network("connection refused"), "/x");
        assert_eq!(network.kind(), ErrorKind::NetworkError);
        assert!(network.is_retryable());
    }

    #[test]
    fn test_unmapped_status_is_unknown() {
        let error = classify_failure(TransportFailure::status(418, None), "/teapot");
        assert_eq!(error.kind(), ErrorKind::UnknownError);
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_field_errors_become_suggestions() {
        let body = json!({
            "error": {
                "message": "Invalid service request",
                "errors": [
                    {"code": "item.brand", "message": "brand is required"},
                    {"code": "service", "message": "unknown service"}
                ]
            }
        });
        let error = classify_failure(TransportFailure::status(422, Some(body)), "/api/v2/sr");

        assert_eq!(error.message(), "Invalid service request");
        assert_eq!(
            error.suggestions(),
            ["item.brand: brand is required", "service: unknown service"]
        );
    }

    #[test]
    fn test_request_id_is_read_from_headers() {
        let failure = TransportFailure::status(500, None).with_header("X-Request-Id", "req-123");
        let error = classify_failure(failure, "/api/v2/sr/abc");

        assert_eq!(error.context().request_id.as_deref(), Some("req-123"));
        assert_eq!(error.context().endpoint.as_deref(), Some("/api/v2/sr/abc"));
        assert!(error.cause().is_some());
    }

    #[test]
    fn test_classified_errors_pass_through_unchanged() {
        let original = LegitmarkError::new(ErrorKind::TimeoutError, "polling timed out")
            .with_retryable(false)
            .with_suggestion("wait longer");
        let boxed: BoxError = Box::new(original);

        let result = classify_error(boxed, "/other");
        assert_eq!(result.kind(), ErrorKind::TimeoutError);
        assert!(!result.is_retryable());
        assert_eq!(result.message(), "polling timed out");
        assert_eq!(result.suggestions(), ["wait longer"]);
        assert_eq!(result.context().endpoint, None);
    }

    #[test]
    fn test_foreign_errors_become_unknown() {
        let boxed: BoxError = Box::new(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        let result = classify_error(boxed, "/x");
        assert_eq!(result.kind(), ErrorKind::UnknownError);
        assert!(!result.is_retryable());
    }
}
