//! JSON fixtures shaped like API responses

use serde_json::{json, Value};
use uuid::Uuid;

use legitmark::models::{CreateServiceRequest, ItemDescriptor};

/// A side entry of a service request listing
#[derive(Debug, Clone)]
pub struct SideFixture {
    pub uuid: Uuid,
    pub name: String,
    pub required: bool,
    pub group_name: Option<String>,
    pub uploaded: bool,
}

impl SideFixture {
    pub fn required(name: &str) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            required: true,
            group_name: None,
            uploaded: false,
        }
    }

    pub fn optional(name: &str) -> Self {
        Self {
            required: false,
            ..Self::required(name)
        }
    }

    pub fn in_group(mut self, group: &str) -> Self {
        self.group_name = Some(group.to_string());
        self
    }

    pub fn uploaded(mut self) -> Self {
        self.uploaded = true;
        self
    }

    pub fn to_json(&self) -> Value {
        let media = if self.uploaded {
            json!([{"uuid": Uuid::new_v4(), "url": "https://cdn.example.com/m.jpg", "status": "ACCEPTED"}])
        } else {
            json!([])
        };
        json!({
            "uuid": self.uuid,
            "name": self.name,
            "required": self.required,
            "group_name": self.group_name,
            "media": media,
        })
    }
}

/// Builder for `{"sr": {...}}` response bodies
#[derive(Debug, Clone)]
pub struct SrFixture {
    pub uuid: Uuid,
    primary: String,
    supplement: Option<String>,
    sides: Option<Vec<SideFixture>>,
    with_requirements: bool,
}

impl SrFixture {
    pub fn draft(uuid: Uuid) -> Self {
        Self {
            uuid,
            primary: "DRAFT".to_string(),
            supplement: None,
            sides: None,
            with_requirements: false,
        }
    }

    pub fn with_state(mut self, primary: &str, supplement: Option<&str>) -> Self {
        self.primary = primary.to_string();
        self.supplement = supplement.map(str::to_string);
        self
    }

    pub fn with_sides(mut self, sides: Vec<SideFixture>) -> Self {
        self.sides = Some(sides);
        self.with_requirements = true;
        self
    }

    /// Same sides, all marked as uploaded
    pub fn all_uploaded(mut self) -> Self {
        if let Some(sides) = self.sides.as_mut() {
            for side in sides {
                side.uploaded = true;
            }
        }
        self
    }

    pub fn build(&self) -> Value {
        let mut sr = json!({
            "uuid": self.uuid,
            "id": "LM-1042",
            "state": {"primary": self.primary, "supplement": self.supplement},
        });
        if let Some(sides) = &self.sides {
            sr["sides"] = Value::Array(sides.iter().map(SideFixture::to_json).collect());
        }
        if self.with_requirements {
            sr["requirements"] = json!({
                "side_groups": [{"name": "Exterior", "sides": []}]
            });
        }
        json!({ "sr": sr })
    }
}

pub fn taxonomy_tree() -> Value {
    json!({
        "data": [{
            "uuid": Uuid::new_v4(),
            "name": "Handbags",
            "active": true,
            "types": [{
                "uuid": Uuid::new_v4(),
                "name": "Tote",
                "brands": [{"uuid": Uuid::new_v4(), "name": "Acme Leather"}]
            }]
        }]
    })
}

pub fn create_request() -> CreateServiceRequest {
    CreateServiceRequest::new(
        Uuid::new_v4(),
        ItemDescriptor {
            category: Uuid::new_v4(),
            item_type: Uuid::new_v4(),
            brand: Uuid::new_v4(),
        },
    )
    .with_external_id("order-1042")
}

pub fn upload_url(side: &SideFixture) -> Value {
    json!({ "url": format!("https://uploads.example.com/{}", side.uuid) })
}
