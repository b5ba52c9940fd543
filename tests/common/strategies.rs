//! Proptest strategies for webhook payloads

use proptest::prelude::*;
use serde_json::{json, Value};

pub fn primary_state_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["DRAFT", "QC", "QUEUE", "UNDERWAY", "COMPLETE", "CANCELLED"])
}

pub fn supplement_state_strategy() -> impl Strategy<Value = Option<&'static str>> {
    prop::option::of(prop::sample::select(vec![
        "PENDING", "REJECTED", "ASSIGNED", "APPROVED", "COMPLETE",
    ]))
}

/// Unknown top-level fields a newer server might send
pub fn extra_fields_strategy() -> impl Strategy<Value = Vec<(String, Value)>> {
    prop::collection::vec(
        (
            "x_[a-z]{1,12}",
            prop_oneof![
                any::<i64>().prop_map(Value::from),
                "[a-zA-Z0-9 ]{0,16}".prop_map(Value::from),
                any::<bool>().prop_map(Value::from),
            ],
        ),
        0..4,
    )
}

pub fn state_change_payload_strategy() -> impl Strategy<Value = Value> {
    (
        primary_state_strategy(),
        supplement_state_strategy(),
        prop::option::of("[a-z0-9-]{1,20}"),
        extra_fields_strategy(),
    )
        .prop_map(|(primary, supplement, reference_id, extra)| {
            let mut payload = json!({
                "event_type": "state_change",
                "sr_uuid": "4a1b0c3e-9f57-4d0b-8d0e-2a8b1f6f7c11",
                "reference_id": reference_id,
                "timestamp": "2026-03-14T09:26:53Z",
                "state": {"primary": primary, "supplement": supplement},
            });
            for (key, value) in extra {
                payload[key] = value;
            }
            payload
        })
}

pub fn media_rejected_payload_strategy() -> impl Strategy<Value = Value> {
    prop::collection::vec(("[A-Za-z ]{1,16}", "[A-Z_]{1,12}"), 0..5).prop_map(|sides| {
        let sides: Vec<Value> = sides
            .into_iter()
            .map(|(side, reason)| json!({"side": side, "reason": reason}))
            .collect();
        json!({
            "event_type": "media_rejected",
            "sr_uuid": "4a1b0c3e-9f57-4d0b-8d0e-2a8b1f6f7c11",
            "reference_id": null,
            "timestamp": "2026-03-14T09:26:53Z",
            "sides": sides,
        })
    })
}

pub fn valid_payload_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        state_change_payload_strategy(),
        media_rejected_payload_strategy(),
    ]
}
