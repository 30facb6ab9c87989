//! Template-driven source generation for entities and views.
//!
//! One file per entity, placed under a schema subdirectory when the entity is
//! not in the default schema. Views produce either a single file, or a
//! `.generated` file whose hand-maintained companion is never written.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use tracing::{debug, info};

use crate::codegen::fs_utils::{self, WriteOutcome};
use crate::codegen::templates::{load_engine, TemplateSet, ENTITY_TEMPLATE, VIEW_TEMPLATE};
use crate::codegen::types::{MergedDocument, ValidationRules, ViewDefinition};
use crate::ddl::{canonical_to_binding_type, canonical_to_target_type, CanonicalType};
use crate::error::{Error, Result};
use crate::schema::{schema_directory, Entity, Property, DEFAULT_SCHEMA};

/// Subdirectory of the output root that receives view sources in [`CodeGenerator::generate`]
pub const VIEWS_SUBDIRECTORY: &str = "Views";

/// Options shared by every generated file
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Namespace written into generated classes
    pub namespace: String,
    /// Extension of generated files, without the dot
    pub extension: String,
    /// Entities in this schema are written at the output root
    pub default_schema: String,
    /// Fixed generation time; `None` uses the current time
    pub generated_at: Option<DateTime<Utc>>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            namespace: "Generated".to_string(),
            extension: "cs".to_string(),
            default_schema: DEFAULT_SCHEMA.to_string(),
            generated_at: None,
        }
    }
}

#[derive(Serialize)]
struct PropertyContext<'a> {
    #[serde(flatten)]
    property: &'a Property,
    target_type: String,
    binding_type: &'static str,
}

#[derive(Serialize)]
struct EntityContext<'a> {
    entity: &'a Entity,
    properties: Vec<PropertyContext<'a>>,
    primary_key: Option<&'a Property>,
    namespace: &'a str,
    schema_directory: Option<String>,
    generated_at: &'a str,
}

#[derive(Serialize)]
struct ViewFieldContext<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    field_type: &'a str,
    nullable: bool,
    validation: Option<&'a ValidationRules>,
    canonical_type: CanonicalType,
    target_type: String,
    binding_type: &'static str,
}

impl<'a> ViewFieldContext<'a> {
    fn new(
        name: &'a str,
        field_type: &'a str,
        nullable: bool,
        validation: Option<&'a ValidationRules>,
    ) -> Self {
        let canonical_type = CanonicalType::resolve(field_type);
        Self {
            name,
            field_type,
            nullable,
            validation,
            canonical_type,
            target_type: canonical_to_target_type(canonical_type, nullable),
            binding_type: canonical_to_binding_type(canonical_type),
        }
    }
}

#[derive(Serialize)]
struct ViewContext<'a> {
    view: &'a ViewDefinition,
    parameters: Vec<ViewFieldContext<'a>>,
    properties: Vec<ViewFieldContext<'a>>,
    has_parameters: bool,
    has_properties: bool,
    namespace: &'a str,
    generated_at: &'a str,
}

/// Renders entity and view sources from templates
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    options: GeneratorOptions,
    generated_at: String,
}

impl CodeGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        let generated_at = options
            .generated_at
            .unwrap_or_else(Utc::now)
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string();
        Self {
            options,
            generated_at,
        }
    }

    /// Generate every entity into `output_root` and every view into
    /// `output_root/Views`. Returns the number of files written.
    pub fn generate(
        &self,
        document: &MergedDocument,
        templates: &TemplateSet,
        output_root: &Path,
    ) -> Result<usize> {
        self.generate_into(
            document,
            templates,
            output_root,
            &output_root.join(VIEWS_SUBDIRECTORY),
        )
    }

    /// Like [`CodeGenerator::generate`], with separate entity and view directories
    pub fn generate_into(
        &self,
        document: &MergedDocument,
        templates: &TemplateSet,
        entities_dir: &Path,
        views_dir: &Path,
    ) -> Result<usize> {
        // Both templates load before the first write
        let tera = load_engine(&[
            (ENTITY_TEMPLATE, templates.entity.as_path()),
            (VIEW_TEMPLATE, templates.view.as_path()),
        ])?;

        let entities = self.render_entities(&tera, &document.entities, entities_dir)?;
        let views = self.render_views(&tera, &document.views, views_dir)?;
        Ok(entities + views)
    }

    /// Generate one source file per entity. Returns the number of files written.
    pub fn generate_entities(
        &self,
        entities: &[Entity],
        template: &Path,
        output_dir: &Path,
    ) -> Result<usize> {
        let tera = load_engine(&[(ENTITY_TEMPLATE, template)])?;
        self.render_entities(&tera, entities, output_dir)
    }

    /// Generate view sources. Returns the number of files written.
    pub fn generate_views(
        &self,
        views: &[ViewDefinition],
        template: &Path,
        output_dir: &Path,
    ) -> Result<usize> {
        let tera = load_engine(&[(VIEW_TEMPLATE, template)])?;
        self.render_views(&tera, views, output_dir)
    }

    /// Path an entity is written to
    pub fn entity_path(&self, entity: &Entity, output_dir: &Path) -> PathBuf {
        let file_name = format!("{}.{}", entity.name, self.options.extension);
        match schema_directory(entity.schema.as_deref(), &self.options.default_schema) {
            Some(dir) => output_dir.join(dir).join(file_name),
            None => output_dir.join(file_name),
        }
    }

    /// Path a view is written to; the `.generated` variant for partial views
    pub fn view_path(&self, view: &ViewDefinition, output_dir: &Path) -> PathBuf {
        let file_name = if view.generate_partial {
            format!("{}.generated.{}", view.name, self.options.extension)
        } else {
            format!("{}.{}", view.name, self.options.extension)
        };
        output_dir.join(file_name)
    }

    /// Hand-maintained companion of a partial view
    pub fn view_companion_path(&self, view: &ViewDefinition, output_dir: &Path) -> PathBuf {
        output_dir.join(format!("{}.{}", view.name, self.options.extension))
    }

    fn render_entities(&self, tera: &Tera, entities: &[Entity], output_dir: &Path) -> Result<usize> {
        let mut written = 0;

        for entity in entities {
            let context = EntityContext {
                entity,
                properties: entity
                    .properties
                    .iter()
                    .map(|property| PropertyContext {
                        property,
                        target_type: canonical_to_target_type(
                            property.canonical_type,
                            !property.is_required,
                        ),
                        binding_type: canonical_to_binding_type(property.canonical_type),
                    })
                    .collect(),
                primary_key: entity.primary_key(),
                namespace: &self.options.namespace,
                schema_directory: schema_directory(
                    entity.schema.as_deref(),
                    &self.options.default_schema,
                ),
                generated_at: &self.generated_at,
            };

            let source = tera.render(ENTITY_TEMPLATE, &Context::from_serialize(&context)?)?;
            let path = self.entity_path(entity, output_dir);
            write_source(&path, &source)?;
            written += 1;
        }

        info!("Generated {} entity files in {}", written, output_dir.display());
        Ok(written)
    }

    fn render_views(&self, tera: &Tera, views: &[ViewDefinition], output_dir: &Path) -> Result<usize> {
        let mut written = 0;

        for view in views {
            let context = ViewContext {
                view,
                parameters: view
                    .parameters
                    .iter()
                    .map(|p| ViewFieldContext::new(&p.name, &p.field_type, p.nullable, p.validation.as_ref()))
                    .collect(),
                properties: view
                    .properties
                    .iter()
                    .map(|p| ViewFieldContext::new(&p.name, &p.field_type, p.nullable, p.validation.as_ref()))
                    .collect(),
                has_parameters: !view.parameters.is_empty(),
                has_properties: !view.properties.is_empty(),
                namespace: &self.options.namespace,
                generated_at: &self.generated_at,
            };

            let source = tera.render(VIEW_TEMPLATE, &Context::from_serialize(&context)?)?;
            let path = self.view_path(view, output_dir);
            write_source(&path, &source)?;
            written += 1;

            if view.generate_partial {
                let companion = self.view_companion_path(view, output_dir);
                if !companion.exists() {
                    debug!(
                        "Partial view {} has no hand-maintained {} yet",
                        view.name,
                        companion.display()
                    );
                }
            }
        }

        info!("Generated {} view files in {}", written, output_dir.display());
        Ok(written)
    }
}

fn write_source(path: &Path, source: &str) -> Result<()> {
    let outcome = fs_utils::write_file(path, source).map_err(|e| Error::io(path, e))?;
    match outcome {
        WriteOutcome::Created => debug!("Created {}", path.display()),
        WriteOutcome::Overwritten => debug!("Overwrote {}", path.display()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::types::{ViewParameter, ViewProperty};
    use chrono::TimeZone;
    use std::fs;
    use tempfile::TempDir;

    const ENTITY_TPL: &str = "// {{ generated_at }}\nnamespace {{ namespace }};\npublic class {{ entity.name }} {\n{% for p in properties %}    public {{ p.target_type }} {{ p.name }} { get; set; }\n{% endfor %}}\n";
    const VIEW_TPL: &str = "// {{ generated_at }}\npublic partial class {{ view.name }}Result { params={{ has_parameters }} props={{ has_properties }}\n{% for p in properties %}    public {{ p.target_type }} {{ p.name }};\n{% endfor %}}\n";

    fn templates(dir: &Path) -> TemplateSet {
        let set = TemplateSet::from_dir(dir);
        fs::write(&set.entity, ENTITY_TPL).unwrap();
        fs::write(&set.view, VIEW_TPL).unwrap();
        set
    }

    fn generator() -> CodeGenerator {
        CodeGenerator::new(GeneratorOptions {
            namespace: "Shop.Data".to_string(),
            generated_at: Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()),
            ..Default::default()
        })
    }

    fn entity(name: &str, schema: Option<&str>) -> Entity {
        Entity {
            name: name.to_string(),
            schema: schema.map(String::from),
            table: format!("{}s", name),
            properties: vec![
                Property {
                    name: "Id".to_string(),
                    canonical_type: CanonicalType::Int,
                    is_primary_key: true,
                    is_identity: true,
                    is_required: true,
                    max_length: None,
                    precision: None,
                    scale: None,
                    default_value: None,
                },
                Property {
                    name: "CategoryId".to_string(),
                    canonical_type: CanonicalType::Int,
                    is_primary_key: false,
                    is_identity: false,
                    is_required: false,
                    max_length: None,
                    precision: None,
                    scale: None,
                    default_value: None,
                },
            ],
            relationships: vec![],
        }
    }

    #[test]
    fn test_entity_files_and_schema_directories() {
        let temp_dir = TempDir::new().unwrap();
        let set = templates(temp_dir.path());
        let out = temp_dir.path().join("out");

        let entities = vec![
            entity("Product", None),
            entity("Order", Some("sales")),
            entity("Audit", Some("dbo")),
        ];
        let count = generator().generate_entities(&entities, &set.entity, &out).unwrap();

        assert_eq!(count, 3);
        let product = fs::read_to_string(out.join("Product.cs")).unwrap();
        assert!(product.contains("namespace Shop.Data;"));
        assert!(product.contains("public int Id { get; set; }"));
        assert!(product.contains("public int? CategoryId { get; set; }"));
        assert!(product.contains("2024-01-02 03:04:05 UTC"));
        assert!(out.join("Sales/Order.cs").exists());
        assert!(out.join("Audit.cs").exists());
    }

    #[test]
    fn test_partial_view_leaves_companion_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let set = templates(temp_dir.path());
        let out = temp_dir.path().join("views");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("Totals.cs"), "// hand written").unwrap();

        let views = vec![
            ViewDefinition {
                name: "Totals".to_string(),
                generate_partial: true,
                parameters: vec![ViewParameter {
                    name: "Year".to_string(),
                    field_type: "int".to_string(),
                    ..Default::default()
                }],
                properties: vec![ViewProperty {
                    name: "Amount".to_string(),
                    field_type: "decimal".to_string(),
                    nullable: true,
                    validation: None,
                }],
                ..Default::default()
            },
            ViewDefinition {
                name: "Plain".to_string(),
                ..Default::default()
            },
        ];

        let count = generator().generate_views(&views, &set.view, &out).unwrap();

        assert_eq!(count, 2);
        assert_eq!(fs::read_to_string(out.join("Totals.cs")).unwrap(), "// hand written");
        let generated = fs::read_to_string(out.join("Totals.generated.cs")).unwrap();
        assert!(generated.contains("params=true props=true"));
        assert!(generated.contains("public decimal? Amount;"));

        let plain = fs::read_to_string(out.join("Plain.cs")).unwrap();
        assert!(plain.contains("params=false props=false"));
        assert!(!out.join("Plain.generated.cs").exists());
    }

    #[test]
    fn test_generate_places_views_in_subdirectory() {
        let temp_dir = TempDir::new().unwrap();
        let set = templates(temp_dir.path());
        let out = temp_dir.path().join("gen");

        let document = MergedDocument {
            entities: vec![entity("Product", None)],
            views: vec![ViewDefinition {
                name: "Totals".to_string(),
                ..Default::default()
            }],
            applications: vec![],
        };

        let count = generator().generate(&document, &set, &out).unwrap();
        assert_eq!(count, 2);
        assert!(out.join("Product.cs").exists());
        assert!(out.join("Views/Totals.cs").exists());
    }

    #[test]
    fn test_missing_template_aborts_before_writing() {
        let temp_dir = TempDir::new().unwrap();
        let set = TemplateSet::from_dir(temp_dir.path());
        fs::write(&set.entity, ENTITY_TPL).unwrap();
        let out = temp_dir.path().join("gen");

        let document = MergedDocument {
            entities: vec![entity("Product", None)],
            ..Default::default()
        };

        let err = generator().generate(&document, &set, &out).unwrap_err();
        assert!(matches!(err, Error::MissingTemplate(_)));
        assert!(!out.exists());
    }

    #[test]
    fn test_regeneration_is_stable() {
        let temp_dir = TempDir::new().unwrap();
        let set = templates(temp_dir.path());
        let out = temp_dir.path().join("gen");
        let entities = vec![entity("Product", Some("sales"))];

        generator().generate_entities(&entities, &set.entity, &out).unwrap();
        let first = fs::read_to_string(out.join("Sales/Product.cs")).unwrap();
        generator().generate_entities(&entities, &set.entity, &out).unwrap();
        let second = fs::read_to_string(out.join("Sales/Product.cs")).unwrap();

        assert_eq!(first, second);
    }
}
