//! # API Constants
//!
//! Endpoint paths and wire-level names shared by the resource layer and webhooks.

/// REST endpoint paths, relative to the configured base URL
pub mod endpoints {
    use uuid::Uuid;

    pub const TAXONOMY_TREE: &str = "/api/v2/categories/tree";
    pub const SERVICE_REQUESTS: &str = "/api/v2/sr";

    pub fn service_request(sr_uuid: Uuid) -> String {
        format!("{SERVICE_REQUESTS}/{sr_uuid}")
    }

    pub fn submit(sr_uuid: Uuid) -> String {
        format!("{SERVICE_REQUESTS}/{sr_uuid}/submit")
    }

    pub fn upload_url(sr_uuid: Uuid, side_uuid: Uuid) -> String {
        format!("{SERVICE_REQUESTS}/{sr_uuid}/sides/{side_uuid}/upload-url")
    }
}

/// Keys wrapping entities in API responses
pub mod response_keys {
    pub const SERVICE_REQUEST: &str = "sr";
    pub const DATA: &str = "data";
    pub const UPLOAD_URL: &str = "url";
}

/// Webhook `event_type` discriminants
pub mod webhook_event_types {
    pub const STATE_CHANGE: &str = "state_change";
    pub const MEDIA_REJECTED: &str = "media_rejected";
    pub const INVALIDATE_SR: &str = "invalidate_sr";

    pub const ALL: [&str; 3] = [STATE_CHANGE, MEDIA_REJECTED, INVALIDATE_SR];
}
