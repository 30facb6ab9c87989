//! Document handling and source generation.
//!
//! This module loads and saves the YAML documents in any supported naming
//! convention, merges the canonical schema with authored views and application
//! visibility, and renders entity and view sources from Tera templates.

pub mod types;
pub mod yaml_loader;
pub mod merge;
pub mod utils;
pub mod templates;
pub mod generator;
pub mod orchestration;
pub mod project_config;
pub mod fs_utils;

// Re-export key types
pub use types::{
    ApplicationVisibility, ApplicationsDocument, MergedDocument, ValidationRules,
    ViewDefinition, ViewParameter, ViewProperty, ViewsDocument,
};
pub use yaml_loader::{
    load_applications, load_merged, load_schema, load_views, save_merged, save_schema,
    DocumentSource, NamingConvention,
};
pub use merge::merge;
pub use templates::TemplateSet;
pub use generator::{CodeGenerator, GeneratorOptions};
pub use orchestration::{run_pipeline, run_pipeline_with, PipelineSummary};
pub use project_config::{ProjectConfig, CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE};

/// Run the full pipeline from a schemagen.yaml configuration file
///
/// # Example
///
/// ```rust,no_run
/// fn main() {
///     let summary = schemagen::codegen::generate_from_yaml("schemagen.yaml")
///         .expect("Code generation failed");
///     println!("{} files written", summary.files_written);
/// }
/// ```
pub fn generate_from_yaml(
    yaml_path: impl AsRef<std::path::Path>,
) -> crate::error::Result<PipelineSummary> {
    let config = ProjectConfig::from_file(yaml_path)?;
    run_pipeline(&config)
}
