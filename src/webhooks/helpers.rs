//! Outcome predicates over parsed webhook events.
//!
//! Each predicate only compares fields; none cross-checks the others.

use super::events::{StateChangeEvent, WebhookEvent};
use crate::models::{PrimaryState, SupplementState};

fn state_is(
    event: &WebhookEvent,
    primary: PrimaryState,
    supplement: Option<SupplementState>,
) -> bool {
    event
        .as_state_change()
        .is_some_and(|change| matches_state(change, &primary, supplement.as_ref()))
}

fn matches_state(
    change: &StateChangeEvent,
    primary: &PrimaryState,
    supplement: Option<&SupplementState>,
) -> bool {
    &change.state.primary == primary
        && supplement.map_or(true, |expected| change.state.supplement.as_ref() == Some(expected))
}

/// Authentication finished and the item passed
pub fn is_authentic(event: &WebhookEvent) -> bool {
    state_is(event, PrimaryState::Complete, Some(SupplementState::Approved))
}

/// Authentication finished and the item failed
pub fn is_counterfeit(event: &WebhookEvent) -> bool {
    state_is(event, PrimaryState::Complete, Some(SupplementState::Rejected))
}

pub fn is_cancelled(event: &WebhookEvent) -> bool {
    state_is(event, PrimaryState::Cancelled, None)
}

/// Photos were rejected; new images must be uploaded
pub fn needs_resubmission(event: &WebhookEvent) -> bool {
    matches!(event, WebhookEvent::MediaRejected(_))
}

pub fn is_qc_approved(event: &WebhookEvent) -> bool {
    state_is(event, PrimaryState::Qc, Some(SupplementState::Approved))
}

pub fn is_authentication_in_progress(event: &WebhookEvent) -> bool {
    state_is(event, PrimaryState::Underway, Some(SupplementState::Assigned))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webhooks::parse_webhook_event;
    use serde_json::{json, Value};

    fn event(primary: &str, supplement: Value) -> WebhookEvent {
        parse_webhook_event(&json!({
            "event_type": "state_change",
            "sr_uuid": "4a1b0c3e-9f57-4d0b-8d0e-2a8b1f6f7c11",
            "reference_id": null,
            "timestamp": "2026-03-14T09:26:53Z",
            "state": {"primary": primary, "supplement": supplement}
        }))
        .unwrap()
    }

    #[test]
    fn test_state_change_predicates() {
        let cases = [
            ("COMPLETE", json!("APPROVED"), [true, false, false, false, false]),
            ("COMPLETE", json!("REJECTED"), [false, true, false, false, false]),
            ("CANCELLED", json!("PENDING"), [false, false, true, false, false]),
            ("CANCELLED", json!(null), [false, false, true, false, false]),
            ("QC", json!("APPROVED"), [false, false, false, true, false]),
            ("UNDERWAY", json!("ASSIGNED"), [false, false, false, false, true]),
            ("DRAFT", json!(null), [false, false, false, false, false]),
        ];

        for (primary, supplement, expected) in cases {
            let event = event(primary, supplement.clone());
            let actual = [
                is_authentic(&event),
                is_counterfeit(&event),
                is_cancelled(&event),
                is_qc_approved(&event),
                is_authentication_in_progress(&event),
            ];
            assert_eq!(actual, expected, "{primary}/{supplement}");
            assert!(!needs_resubmission(&event));
        }
    }

    #[test]
    fn test_media_rejected_needs_resubmission_regardless_of_sides() {
        let event = parse_webhook_event(&json!({
            "event_type": "media_rejected",
            "sr_uuid": "4a1b0c3e-9f57-4d0b-8d0e-2a8b1f6f7c11",
            "timestamp": "2026-03-14T09:26:53Z",
            "sides": []
        }))
        .unwrap();
        assert!(needs_resubmission(&event));
        assert!(!is_authentic(&event));
        assert!(!is_cancelled(&event));
    }
}
