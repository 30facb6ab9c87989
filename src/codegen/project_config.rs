//! Project configuration schema for schemagen.yaml
//!
//! This module defines the structure of the project-level configuration that
//! drives the full `parse → merge → generate` pipeline. Every field has a
//! default, so an empty file is a valid configuration. Relative paths are
//! resolved against the directory holding the configuration file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::codegen::generator::GeneratorOptions;
use crate::codegen::templates::TemplateSet;
use crate::codegen::yaml_loader::{DocumentSource, NamingConvention};
use crate::error::{Error, Result};
use crate::schema::DEFAULT_SCHEMA;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "schemagen.yaml";

/// Environment variable that overrides the configuration file path
pub const CONFIG_ENV_VAR: &str = "SCHEMAGEN_CONFIG";

/// Top-level project configuration from schemagen.yaml
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub inputs: Inputs,
    #[serde(default)]
    pub outputs: Outputs,
    #[serde(default)]
    pub codegen: CodegenOptions,
}

/// Authored inputs
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Inputs {
    /// DDL script
    #[serde(default = "default_sql")]
    pub sql: PathBuf,
    #[serde(default)]
    pub views: Option<DocumentSource>,
    #[serde(default)]
    pub applications: Option<DocumentSource>,
    /// Directory holding `entity.cs.tera` and `view.cs.tera`
    #[serde(default = "default_templates_dir")]
    pub templates: PathBuf,
}

impl Default for Inputs {
    fn default() -> Self {
        Self {
            sql: default_sql(),
            views: None,
            applications: None,
            templates: default_templates_dir(),
        }
    }
}

/// Intermediate documents and generated source locations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Outputs {
    #[serde(default = "default_schema_document")]
    pub schema: PathBuf,
    #[serde(default = "default_merged_document")]
    pub merged: PathBuf,
    /// Convention the schema and merged documents are written in
    #[serde(default)]
    pub convention: NamingConvention,
    #[serde(default = "default_entities_dir")]
    pub entities: PathBuf,
    #[serde(default = "default_views_dir")]
    pub views: PathBuf,
}

impl Default for Outputs {
    fn default() -> Self {
        Self {
            schema: default_schema_document(),
            merged: default_merged_document(),
            convention: NamingConvention::default(),
            entities: default_entities_dir(),
            views: default_views_dir(),
        }
    }
}

/// Code generation options
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CodegenOptions {
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default = "default_schema_name")]
    pub default_schema: String,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            extension: default_extension(),
            default_schema: default_schema_name(),
        }
    }
}

fn default_sql() -> PathBuf {
    PathBuf::from("schema.sql")
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_schema_document() -> PathBuf {
    PathBuf::from("schema.yaml")
}

fn default_merged_document() -> PathBuf {
    PathBuf::from("merged.yaml")
}

fn default_entities_dir() -> PathBuf {
    PathBuf::from("generated/Entities")
}

fn default_views_dir() -> PathBuf {
    PathBuf::from("generated/Views")
}

fn default_namespace() -> String {
    "Generated".to_string()
}

fn default_extension() -> String {
    "cs".to_string()
}

fn default_schema_name() -> String {
    DEFAULT_SCHEMA.to_string()
}

impl ProjectConfig {
    /// Load project configuration from schemagen.yaml
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;

        let config = Self::from_yaml_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

        match path.parent() {
            Some(base) if !base.as_os_str().is_empty() => Ok(config.relative_to(base)),
            _ => Ok(config),
        }
    }

    /// Parse configuration text; an empty document yields the defaults
    pub fn from_yaml_str(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    /// Resolve every relative path against `base`
    pub fn relative_to(mut self, base: &Path) -> Self {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };

        resolve(&mut self.inputs.sql);
        resolve(&mut self.inputs.templates);
        if let Some(views) = self.inputs.views.as_mut() {
            resolve(&mut views.path);
        }
        if let Some(applications) = self.inputs.applications.as_mut() {
            resolve(&mut applications.path);
        }
        resolve(&mut self.outputs.schema);
        resolve(&mut self.outputs.merged);
        resolve(&mut self.outputs.entities);
        resolve(&mut self.outputs.views);
        self
    }

    pub fn templates(&self) -> TemplateSet {
        TemplateSet::from_dir(&self.inputs.templates)
    }

    pub fn schema_target(&self) -> DocumentSource {
        DocumentSource::new(&self.outputs.schema, self.outputs.convention)
    }

    pub fn merged_target(&self) -> DocumentSource {
        DocumentSource::new(&self.outputs.merged, self.outputs.convention)
    }

    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            namespace: self.codegen.namespace.clone(),
            extension: self.codegen.extension.clone(),
            default_schema: self.codegen.default_schema.clone(),
            generated_at: None,
        }
    }
}
