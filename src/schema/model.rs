//! Canonical schema model.
//!
//! These types are what the schema document serializes. Field names use the
//! canonical (snake_case) convention; other conventions are handled at the
//! document boundary in `codegen::yaml_loader`.

use serde::{Deserialize, Serialize};

use crate::ddl::CanonicalType;

/// The only relationship kind inferred from foreign keys
pub const ONE_TO_MANY: &str = "one-to-many";

/// Entities derived from one DDL script
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CanonicalSchema {
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl CanonicalSchema {
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Source table name
    #[serde(default)]
    pub table: String,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl Entity {
    pub fn primary_key(&self) -> Option<&Property> {
        self.properties.iter().find(|p| p.is_primary_key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(rename = "type")]
    pub canonical_type: CanonicalType,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default)]
    pub is_identity: bool,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(rename = "type", default = "default_relationship_kind")]
    pub kind: String,
    pub target_entity: String,
    pub foreign_key: String,
    pub principal_key: String,
}

fn default_relationship_kind() -> String {
    ONE_TO_MANY.to_string()
}
