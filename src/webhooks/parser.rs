use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use super::events::WebhookEvent;
use crate::constants::webhook_event_types;
use crate::error::LegitmarkError;

/// Why an inbound payload was rejected. Every message names the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookValidationError {
    #[error("Webhook payload must be a JSON object, got {found}")]
    NotAnObject { found: &'static str },

    #[error("Missing required field `{field}`")]
    MissingField { field: String },

    #[error("Field `{field}` must be {expected}, got {found}")]
    InvalidType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error(
        "Unknown event_type `{received}`; expected one of: {}",
        .expected.join(", ")
    )]
    UnknownEventType {
        received: String,
        expected: Vec<String>,
    },

    #[error("Malformed webhook body: {0}")]
    Malformed(String),
}

impl WebhookValidationError {
    /// Field the rejection refers to, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingField { field } | Self::InvalidType { field, .. } => Some(field),
            Self::UnknownEventType { .. } => Some("event_type"),
            Self::NotAnObject { .. } | Self::Malformed(_) => None,
        }
    }
}

impl From<WebhookValidationError> for LegitmarkError {
    fn from(error: WebhookValidationError) -> Self {
        let mut converted = LegitmarkError::validation(error.to_string());
        if let Some(field) = error.field() {
            converted = converted.with_detail("field", Value::String(field.to_string()));
        }
        if let WebhookValidationError::UnknownEventType { expected, .. } = &error {
            converted = converted.with_suggestion(format!(
                "Supported event types: {}",
                expected.join(", ")
            ));
        }
        converted.with_cause(error)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn missing(field: &str) -> WebhookValidationError {
    WebhookValidationError::MissingField {
        field: field.to_string(),
    }
}

fn invalid(field: &str, expected: &'static str, found: &Value) -> WebhookValidationError {
    WebhookValidationError::InvalidType {
        field: field.to_string(),
        expected,
        found: json_type(found),
    }
}

fn require_string<'a>(
    object: &'a Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<&'a str, WebhookValidationError> {
    match object.get(key) {
        None => Err(missing(path)),
        Some(Value::String(value)) => Ok(value),
        Some(other) => Err(invalid(path, "a string", other)),
    }
}

fn require_object<'a>(
    object: &'a Map<String, Value>,
    key: &str,
) -> Result<&'a Map<String, Value>, WebhookValidationError> {
    match object.get(key) {
        None => Err(missing(key)),
        Some(Value::Object(value)) => Ok(value),
        Some(other) => Err(invalid(key, "an object", other)),
    }
}

/// Absent, `null`, or a string
fn optional_string(
    object: &Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<(), WebhookValidationError> {
    match object.get(key) {
        None | Some(Value::Null) | Some(Value::String(_)) => Ok(()),
        Some(other) => Err(invalid(path, "a string or null", other)),
    }
}

fn decode<T: DeserializeOwned>(payload: Map<String, Value>) -> Result<T, WebhookValidationError> {
    serde_json::from_value(Value::Object(payload))
        .map_err(|e| WebhookValidationError::Malformed(e.to_string()))
}

/// Validate an untyped payload and discriminate it on `event_type`.
///
/// Unknown fields survive on the returned event's `extra` maps.
pub fn parse_webhook_event(payload: &Value) -> Result<WebhookEvent, WebhookValidationError> {
    let object = match payload {
        Value::Object(object) => object,
        other => {
            return Err(WebhookValidationError::NotAnObject {
                found: json_type(other),
            })
        }
    };

    let event_type = require_string(object, "event_type", "event_type")?;
    if !webhook_event_types::ALL.contains(&event_type) {
        return Err(WebhookValidationError::UnknownEventType {
            received: event_type.to_string(),
            expected: webhook_event_types::ALL
                .iter()
                .map(|t| t.to_string())
                .collect(),
        });
    }

    require_string(object, "sr_uuid", "sr_uuid")?;
    require_string(object, "timestamp", "timestamp")?;

    let mut fields = object.clone();
    fields.remove("event_type");

    let event = match event_type {
        webhook_event_types::STATE_CHANGE => {
            let state = require_object(object, "state")?;
            require_string(state, "primary", "state.primary")?;
            // supplement must be a code string or null
            optional_string(state, "supplement", "state.supplement")?;
            WebhookEvent::StateChange(decode(fields)?)
        }
        webhook_event_types::MEDIA_REJECTED => {
            match object.get("sides") {
                None => return Err(missing("sides")),
                Some(Value::Array(_)) => {}
                Some(other) => return Err(invalid("sides", "an array", other)),
            }
            WebhookEvent::MediaRejected(decode(fields)?)
        }
        _ => {
            let reason = require_object(object, "invalidation_reason")?;
            require_string(reason, "code", "invalidation_reason.code")?;
            require_string(reason, "message", "invalidation_reason.message")?;
            WebhookEvent::InvalidateSr(decode(fields)?)
        }
    };

    debug!(
        event_type = event.event_type(),
        sr_uuid = %event.base().sr_uuid,
        "Parsed webhook event"
    );
    Ok(event)
}

/// Deserialize a raw request body, then validate it
pub fn parse_webhook_body(body: &[u8]) -> Result<WebhookEvent, WebhookValidationError> {
    let payload: Value = serde_json::from_slice(body)
        .map_err(|e| WebhookValidationError::Malformed(e.to_string()))?;
    parse_webhook_event(&payload)
}
