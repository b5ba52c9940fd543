use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::side::{Requirements, Side};
use super::state::SrState;
use crate::transport::QueryParams;

/// Taxonomy references identifying the item to authenticate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDescriptor {
    pub category: Uuid,
    #[serde(rename = "type")]
    pub item_type: Uuid,
    pub brand: Uuid,
}

/// Body of the create call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateServiceRequest {
    /// Authentication service to order
    pub service: Uuid,
    /// Partner-side reference echoed back in webhooks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub item: ItemDescriptor,
}

impl CreateServiceRequest {
    pub fn new(service: Uuid, item: ItemDescriptor) -> Self {
        Self {
            service,
            external_id: None,
            source: None,
            item,
        }
    }

    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// A service request as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub uuid: Uuid,
    /// Short human-facing id
    #[serde(default)]
    pub id: Option<String>,
    pub state: SrState,
    /// Item details; shape depends on the include flags of the fetch
    #[serde(default)]
    pub item: Option<Value>,
    #[serde(default)]
    pub requirements: Option<Requirements>,
    #[serde(default)]
    pub sides: Option<Vec<Side>>,
}

impl ServiceRequest {
    /// Required sides in server order; empty when sides were not included
    pub fn required_sides(&self) -> Vec<&Side> {
        self.sides
            .iter()
            .flatten()
            .filter(|side| side.required)
            .collect()
    }

    pub fn side_count(&self) -> usize {
        self.sides.as_ref().map_or(0, Vec::len)
    }
}

/// Which related data a service request fetch should embed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IncludeOptions {
    pub requirements: bool,
    pub sides: bool,
    pub item: bool,
}

impl IncludeOptions {
    pub fn all() -> Self {
        Self {
            requirements: true,
            sides: true,
            item: true,
        }
    }

    pub fn sides_only() -> Self {
        Self {
            sides: true,
            ..Self::default()
        }
    }

    pub fn to_query(&self) -> QueryParams {
        let mut include = Vec::new();
        if self.requirements {
            include.push("requirements");
        }
        if self.sides {
            include.push("sides");
        }
        if self.item {
            include.push("item");
        }

        if include.is_empty() {
            Vec::new()
        } else {
            vec![("include".to_string(), include.join(","))]
        }
    }
}
