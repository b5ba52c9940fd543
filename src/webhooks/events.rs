use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::models::{PrimaryState, SupplementState};

/// Fields every webhook carries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookBase {
    pub sr_uuid: String,
    /// Partner-supplied reference (the external id given at creation), kept as sent
    #[serde(default)]
    pub reference_id: Option<Value>,
    /// ISO-8601
    pub timestamp: String,
}

impl WebhookBase {
    /// `sr_uuid` as a [`Uuid`], when it is well formed
    pub fn sr_uuid(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sr_uuid).ok()
    }

    /// `reference_id` as text. Numbers and booleans are rendered; arrays and objects
    /// have no text form.
    pub fn reference_id(&self) -> Option<String> {
        match self.reference_id.as_ref()? {
            Value::String(reference) => Some(reference.clone()),
            Value::Number(reference) => Some(reference.to_string()),
            Value::Bool(reference) => Some(reference.to_string()),
            _ => None,
        }
    }

    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventState {
    pub primary: PrimaryState,
    #[serde(default)]
    pub supplement: Option<SupplementState>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateChangeEvent {
    #[serde(flatten)]
    pub base: WebhookBase,
    pub state: EventState,
    /// Fields this crate does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of a `media_rejected` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedSide {
    #[serde(default)]
    pub side: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRejectedEvent {
    #[serde(flatten)]
    pub base: WebhookBase,
    /// Kept as raw values; only the array itself is validated
    pub sides: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MediaRejectedEvent {
    /// Entries that decode as [`RejectedSide`]; others are dropped
    pub fn rejected_sides(&self) -> Vec<RejectedSide> {
        self.sides
            .iter()
            .filter_map(|side| serde_json::from_value(side.clone()).ok())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvalidationReason {
    pub code: String,
    pub message: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvalidationEvent {
    #[serde(flatten)]
    pub base: WebhookBase,
    pub invalidation_reason: InvalidationReason,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A validated webhook, discriminated on `event_type`.
///
/// Build one with [`parse_webhook_event`](super::parse_webhook_event); the serde
/// impls exist for persistence and do not validate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum WebhookEvent {
    StateChange(StateChangeEvent),
    MediaRejected(MediaRejectedEvent),
    InvalidateSr(InvalidationEvent),
}

impl WebhookEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::StateChange(_) => "state_change",
            Self::MediaRejected(_) => "media_rejected",
            Self::InvalidateSr(_) => "invalidate_sr",
        }
    }

    pub fn base(&self) -> &WebhookBase {
        match self {
            Self::StateChange(event) => &event.base,
            Self::MediaRejected(event) => &event.base,
            Self::InvalidateSr(event) => &event.base,
        }
    }

    /// Unrecognized top-level fields
    pub fn extra(&self) -> &Map<String, Value> {
        match self {
            Self::StateChange(event) => &event.extra,
            Self::MediaRejected(event) => &event.extra,
            Self::InvalidateSr(event) => &event.extra,
        }
    }

    pub fn as_state_change(&self) -> Option<&StateChangeEvent> {
        match self {
            Self::StateChange(event) => Some(event),
            _ => None,
        }
    }

    pub fn as_media_rejected(&self) -> Option<&MediaRejectedEvent> {
        match self {
            Self::MediaRejected(event) => Some(event),
            _ => None,
        }
    }

    pub fn as_invalidation(&self) -> Option<&InvalidationEvent> {
        match self {
            Self::InvalidateSr(event) => Some(event),
            _ => None,
        }
    }

    /// The payload as JSON, unknown fields included.
    ///
    /// `reference_id` and `state.supplement` are always present (as `null` when absent
    /// from the input).
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
