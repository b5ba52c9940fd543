use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One photographic requirement of a service request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Side {
    pub uuid: Uuid,
    pub name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub group_uuid: Option<Uuid>,
    #[serde(default)]
    pub ordinal: Option<i32>,
    /// Images already attached to this side
    #[serde(default)]
    pub media: Vec<SideMedia>,
}

impl Side {
    pub fn has_media(&self) -> bool {
        !self.media.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideMedia {
    #[serde(default)]
    pub uuid: Option<Uuid>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideGroup {
    #[serde(default)]
    pub uuid: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub sides: Vec<Side>,
}

impl SideGroup {
    /// Single-side group built from the side's own embedded group fields.
    ///
    /// The sides listing carries no real nested grouping, so callbacks receive this
    /// reconstruction.
    pub fn synthetic_for(side: &Side) -> Self {
        Self {
            uuid: side.group_uuid,
            name: side
                .group_name
                .clone()
                .unwrap_or_else(|| side.name.clone()),
            sides: vec![side.clone()],
        }
    }
}

/// Photo requirements attached to a service request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Requirements {
    #[serde(default)]
    pub side_groups: Vec<SideGroup>,
}
