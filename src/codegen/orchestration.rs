//! High-level orchestration API for the full pipeline.
//!
//! Runs every stage from a [`ProjectConfig`]:
//! 1. Parse the DDL script into table metadata
//! 2. Build the canonical schema and write the schema document
//! 3. Load the optional views and applications documents
//! 4. Merge and write the merged document
//! 5. Generate entity and view sources
//!
//! The run is fail-fast; the first error aborts it.

use std::fs;
use tracing::info;

use crate::codegen::generator::{CodeGenerator, GeneratorOptions};
use crate::codegen::merge::merge;
use crate::codegen::project_config::ProjectConfig;
use crate::codegen::yaml_loader::{load_applications, load_views, save_merged, save_schema};
use crate::ddl::{DdlParser, SqlServerDdlParser};
use crate::error::{Error, Result};
use crate::schema::build_schema;

/// Counts reported after a pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    pub tables: usize,
    pub entities: usize,
    pub views: usize,
    pub applications: usize,
    pub files_written: usize,
}

/// Run the whole pipeline with the configured options
pub fn run_pipeline(config: &ProjectConfig) -> Result<PipelineSummary> {
    run_pipeline_with(config, config.generator_options())
}

/// Run the whole pipeline with explicit generator options
pub fn run_pipeline_with(
    config: &ProjectConfig,
    options: GeneratorOptions,
) -> Result<PipelineSummary> {
    let sql = fs::read_to_string(&config.inputs.sql).map_err(|e| Error::io(&config.inputs.sql, e))?;

    let tables = SqlServerDdlParser::new().parse(&sql)?;
    info!("Parsed {} tables from {}", tables.len(), config.inputs.sql.display());

    let schema = build_schema(&tables);
    save_schema(&schema, &config.schema_target())?;
    info!("Wrote schema document {}", config.outputs.schema.display());

    let views = load_views(config.inputs.views.as_ref())?;
    let applications = load_applications(config.inputs.applications.as_ref())?;
    let document = merge(schema, views, applications);
    save_merged(&document, &config.merged_target())?;
    info!("Wrote merged document {}", config.outputs.merged.display());

    let generator = CodeGenerator::new(options);
    let files_written = generator.generate_into(
        &document,
        &config.templates(),
        &config.outputs.entities,
        &config.outputs.views,
    )?;

    Ok(PipelineSummary {
        tables: tables.len(),
        entities: document.entities.len(),
        views: document.views.len(),
        applications: document.applications.len(),
        files_written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::yaml_loader::{DocumentSource, NamingConvention};
    use std::path::Path;
    use tempfile::TempDir;

    fn write_project(dir: &Path) -> ProjectConfig {
        fs::write(
            dir.join("schema.sql"),
            "CREATE TABLE Categories (Id INT PRIMARY KEY, Name NVARCHAR(50) NOT NULL);",
        )
        .unwrap();
        fs::create_dir_all(dir.join("templates")).unwrap();
        fs::write(dir.join("templates/entity.cs.tera"), "class {{ entity.name }} {}").unwrap();
        fs::write(dir.join("templates/view.cs.tera"), "class {{ view.name }} {}").unwrap();
        ProjectConfig::default().relative_to(dir)
    }

    #[test]
    fn test_pipeline_without_views() {
        let temp_dir = TempDir::new().unwrap();
        let config = write_project(temp_dir.path());

        let summary = run_pipeline(&config).unwrap();

        assert_eq!(summary.tables, 1);
        assert_eq!(summary.entities, 1);
        assert_eq!(summary.views, 0);
        assert_eq!(summary.files_written, 1);
        assert!(config.outputs.schema.exists());
        assert!(config.outputs.merged.exists());
        assert_eq!(
            fs::read_to_string(config.outputs.entities.join("Category.cs")).unwrap(),
            "class Category {}"
        );
    }

    #[test]
    fn test_pipeline_with_pascal_case_views() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = write_project(temp_dir.path());
        let views_path = temp_dir.path().join("views.yaml");
        fs::write(&views_path, "Views:\n  - Name: Totals\n    Applications: [Admin]\n").unwrap();
        let apps_path = temp_dir.path().join("apps.yaml");
        fs::write(&apps_path, "applications:\n  - name: admin\n    entities: [Category]\n").unwrap();
        config.inputs.views = Some(DocumentSource::new(&views_path, NamingConvention::PascalCase));
        config.inputs.applications = Some(DocumentSource::new(&apps_path, NamingConvention::SnakeCase));

        let summary = run_pipeline(&config).unwrap();

        assert_eq!(summary.views, 1);
        assert_eq!(summary.applications, 1);
        assert_eq!(summary.files_written, 2);
        assert!(config.outputs.views.join("Totals.cs").exists());
        let merged = fs::read_to_string(&config.outputs.merged).unwrap();
        assert!(merged.contains("Totals"));
    }

    #[test]
    fn test_pipeline_stops_on_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config = write_project(temp_dir.path());
        fs::write(&config.inputs.sql, "CREATE TABLE (").unwrap();

        let err = run_pipeline(&config).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        assert!(!config.outputs.schema.exists());
    }

    #[test]
    fn test_pipeline_missing_sql() {
        let config = ProjectConfig::default().relative_to(Path::new("/nonexistent"));
        assert!(matches!(run_pipeline(&config).unwrap_err(), Error::Io { .. }));
    }
}
