//! # Webhook Events
//!
//! Validation and classification of inbound webhook payloads. Signature checks,
//! deduplication and delivery acknowledgment stay with the receiving service.
//!
//! ```rust
//! use legitmark::webhooks::{is_authentic, parse_webhook_event};
//! use serde_json::json;
//!
//! let event = parse_webhook_event(&json!({
//!     "event_type": "state_change",
//!     "sr_uuid": "4a1b0c3e-9f57-4d0b-8d0e-2a8b1f6f7c11",
//!     "reference_id": "order-1042",
//!     "timestamp": "2026-03-14T09:26:53Z",
//!     "state": {"primary": "COMPLETE", "supplement": "APPROVED"}
//! }))
//! .unwrap();
//! assert!(is_authentic(&event));
//! ```

mod events;
mod helpers;
mod parser;

pub use events::{
    EventState, InvalidationEvent, InvalidationReason, MediaRejectedEvent, RejectedSide,
    StateChangeEvent, WebhookBase, WebhookEvent,
};
pub use helpers::{
    is_authentic, is_authentication_in_progress, is_cancelled, is_counterfeit, is_qc_approved,
    needs_resubmission,
};
pub use parser::{parse_webhook_body, parse_webhook_event, WebhookValidationError};
