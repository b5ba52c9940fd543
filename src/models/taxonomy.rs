use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Top-level product category (e.g. "Handbags")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub uuid: Uuid,
    pub name: String,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub types: Vec<ItemType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemType {
    pub uuid: Uuid,
    pub name: String,
    #[serde(default)]
    pub brands: Vec<Brand>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brand {
    pub uuid: Uuid,
    pub name: String,
}

impl Category {
    /// Find a type by case-insensitive name
    pub fn find_type(&self, name: &str) -> Option<&ItemType> {
        self.types
            .iter()
            .find(|item_type| item_type.name.eq_ignore_ascii_case(name))
    }
}

impl ItemType {
    pub fn find_brand(&self, name: &str) -> Option<&Brand> {
        self.brands
            .iter()
            .find(|brand| brand.name.eq_ignore_ascii_case(name))
    }
}
