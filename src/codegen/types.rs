//! Type definitions for the authored and merged schema documents.
//!
//! These types represent the structure of the views, applications and merged
//! YAML documents. Field names are the canonical snake_case convention.

use serde::{Deserialize, Serialize};

use crate::schema::{CanonicalSchema, Entity};

fn default_nullable() -> bool {
    false
}

/// Validation rules attached to a view parameter or property
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct ValidationRules {
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Regular expression the value must match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// Input parameter of a view query
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct ViewParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRules>,
}

/// Column of a view result
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct ViewProperty {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRules>,
}

/// Hand-authored view definition
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct ViewDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// SQL file holding the view query, relative to the views document
    #[serde(default)]
    pub sql_file: String,
    /// Emit a `.generated` file and leave a hand-maintained companion alone
    #[serde(default)]
    pub generate_partial: bool,
    /// Applications allowed to display this view
    #[serde(default)]
    pub applications: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<ViewParameter>,
    #[serde(default)]
    pub properties: Vec<ViewProperty>,
}

/// Views document as authored
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct ViewsDocument {
    #[serde(default)]
    pub views: Vec<ViewDefinition>,
}

impl ViewsDocument {
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

/// Names one application may display
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct ApplicationVisibility {
    pub name: String,
    /// Authored directly
    #[serde(default)]
    pub entities: Vec<String>,
    /// Populated by the merge from each view's application list
    #[serde(default)]
    pub views: Vec<String>,
}

/// Applications document as authored
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct ApplicationsDocument {
    #[serde(default)]
    pub applications: Vec<ApplicationVisibility>,
}

/// Entities, views and application visibility in one document
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct MergedDocument {
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub views: Vec<ViewDefinition>,
    #[serde(default)]
    pub applications: Vec<ApplicationVisibility>,
}

impl MergedDocument {
    pub fn application(&self, name: &str) -> Option<&ApplicationVisibility> {
        self.applications
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    pub fn view(&self, name: &str) -> Option<&ViewDefinition> {
        self.views.iter().find(|v| v.name == name)
    }

    /// Entity section as a canonical schema
    pub fn schema(&self) -> CanonicalSchema {
        CanonicalSchema {
            entities: self.entities.clone(),
        }
    }
}
