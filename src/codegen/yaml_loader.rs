//! YAML document loading and saving.
//!
//! Documents written by different tools use different key conventions: the
//! schema document is written with snake_case keys, hand-authored views files
//! are often PascalCase. Every document reference therefore carries its
//! [`NamingConvention`]; keys are translated to the canonical snake_case form on
//! read and to the requested convention on write.

use convert_case::{Case, Casing};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use crate::codegen::fs_utils;
use crate::codegen::types::{ApplicationsDocument, MergedDocument, ViewsDocument};
use crate::error::{Error, Result};
use crate::schema::CanonicalSchema;

/// Key naming convention of a YAML document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingConvention {
    /// `max_length`; the canonical convention
    #[default]
    SnakeCase,
    /// `MaxLength`
    PascalCase,
    /// `maxLength`
    CamelCase,
}

impl NamingConvention {
    fn case(&self) -> Case {
        match self {
            NamingConvention::SnakeCase => Case::Snake,
            NamingConvention::PascalCase => Case::Pascal,
            NamingConvention::CamelCase => Case::Camel,
        }
    }
}

impl fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NamingConvention::SnakeCase => "snake_case",
            NamingConvention::PascalCase => "pascal_case",
            NamingConvention::CamelCase => "camel_case",
        };
        f.write_str(name)
    }
}

impl FromStr for NamingConvention {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "snake_case" | "snakecase" | "snake" | "underscore" => Ok(NamingConvention::SnakeCase),
            "pascal_case" | "pascalcase" | "pascal" => Ok(NamingConvention::PascalCase),
            "camel_case" | "camelcase" | "camel" => Ok(NamingConvention::CamelCase),
            other => Err(format!(
                "Unknown naming convention: '{}'. Supported: snake_case, pascal_case, camel_case",
                other
            )),
        }
    }
}

/// A document on disk together with the convention its keys are written in
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DocumentSource {
    pub path: PathBuf,
    #[serde(default)]
    pub convention: NamingConvention,
}

impl DocumentSource {
    pub fn new(path: impl Into<PathBuf>, convention: NamingConvention) -> Self {
        Self {
            path: path.into(),
            convention,
        }
    }
}

/// Rewrite every mapping key into `case`, recursively. Values are untouched.
fn recase_keys(value: Value, case: Case) -> Value {
    match value {
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(key, value)| {
                    let key = match key {
                        Value::String(s) => Value::String(s.to_case(case)),
                        other => other,
                    };
                    (key, recase_keys(value, case))
                })
                .collect(),
        ),
        Value::Sequence(items) => {
            Value::Sequence(items.into_iter().map(|v| recase_keys(v, case)).collect())
        }
        other => other,
    }
}

/// Deserialize YAML text written in `convention`.
///
/// A non-empty document none of whose top-level keys is a field of `T` is
/// rejected: it was almost certainly read with the wrong convention, and
/// serde would otherwise drop every key and return an empty document.
pub fn from_yaml_str<T>(yaml: &str, convention: NamingConvention) -> std::result::Result<T, serde_yaml::Error>
where
    T: DeserializeOwned + Default + Serialize,
{
    let value: Value = serde_yaml::from_str(yaml)?;
    if value.is_null() {
        return Ok(T::default());
    }

    let value = match convention {
        NamingConvention::SnakeCase => value,
        _ => recase_keys(value, Case::Snake),
    };
    check_top_level_keys::<T>(&value, convention)?;
    serde_yaml::from_value(value)
}

fn check_top_level_keys<T>(value: &Value, convention: NamingConvention) -> std::result::Result<(), serde_yaml::Error>
where
    T: Default + Serialize,
{
    let (Value::Mapping(document), Value::Mapping(fields)) = (value, serde_yaml::to_value(T::default())?) else {
        return Ok(());
    };
    if document.is_empty() || document.keys().any(|key| fields.contains_key(key)) {
        return Ok(());
    }

    let found: Vec<&str> = document.keys().filter_map(Value::as_str).collect();
    let expected: Vec<&str> = fields.keys().filter_map(Value::as_str).collect();
    Err(<serde_yaml::Error as serde::de::Error>::custom(format!(
        "no recognised top-level key when read as {} (found: {}; expected one of: {})",
        convention,
        found.join(", "),
        expected.join(", ")
    )))
}

/// Serialize to YAML text with keys in `convention`
pub fn to_yaml_string<T: Serialize>(
    document: &T,
    convention: NamingConvention,
) -> std::result::Result<String, serde_yaml::Error> {
    let value = serde_yaml::to_value(document)?;
    let value = match convention {
        NamingConvention::SnakeCase => value,
        other => recase_keys(value, other.case()),
    };
    serde_yaml::to_string(&value)
}

/// Read and deserialize a document
pub fn read_document<T>(source: &DocumentSource) -> Result<T>
where
    T: DeserializeOwned + Default + Serialize,
{
    let yaml = fs::read_to_string(&source.path).map_err(|e| Error::io(&source.path, e))?;
    debug!(
        "Reading {} as {}",
        source.path.display(),
        source.convention
    );
    from_yaml_str(&yaml, source.convention).map_err(|e| Error::Yaml {
        path: source.path.clone(),
        source: e,
    })
}

/// Read an optional document. A missing source or missing file reads as `None`.
pub fn read_optional_document<T>(source: Option<&DocumentSource>) -> Result<Option<T>>
where
    T: DeserializeOwned + Default + Serialize,
{
    match source {
        Some(source) if source.path.exists() => read_document(source).map(Some),
        Some(source) => {
            debug!("Optional document {} not found", source.path.display());
            Ok(None)
        }
        None => Ok(None),
    }
}

/// Serialize a document and write it, creating parent directories
pub fn write_document<T: Serialize>(
    document: &T,
    path: impl AsRef<Path>,
    convention: NamingConvention,
) -> Result<()> {
    let path = path.as_ref();
    let yaml = to_yaml_string(document, convention)?;
    fs_utils::write_file(path, yaml).map_err(|e| Error::io(path, e))?;
    Ok(())
}

pub fn load_schema(source: &DocumentSource) -> Result<CanonicalSchema> {
    read_document(source)
}

pub fn load_views(source: Option<&DocumentSource>) -> Result<Option<ViewsDocument>> {
    read_optional_document(source)
}

pub fn load_applications(source: Option<&DocumentSource>) -> Result<Option<ApplicationsDocument>> {
    read_optional_document(source)
}

pub fn load_merged(source: &DocumentSource) -> Result<MergedDocument> {
    read_document(source)
}

pub fn save_schema(schema: &CanonicalSchema, target: &DocumentSource) -> Result<()> {
    write_document(schema, &target.path, target.convention)
}

pub fn save_merged(document: &MergedDocument, target: &DocumentSource) -> Result<()> {
    write_document(document, &target.path, target.convention)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::types::ViewDefinition;
    use crate::ddl::CanonicalType;
    use crate::schema::{Entity, Property};

    #[test]
    fn test_pascal_case_views_read_as_snake_case() {
        let yaml = r#"
Views:
  - Name: ActiveCustomers
    Description: Customers with an order in the last year
    SqlFile: views/active_customers.sql
    GeneratePartial: true
    Applications: [Sales]
    Parameters:
      - Name: Since
        Type: datetime
        Nullable: false
        Validation:
          Required: true
    Properties:
      - Name: CustomerId
        Type: int
"#;
        let doc: ViewsDocument = from_yaml_str(yaml, NamingConvention::PascalCase).unwrap();

        assert_eq!(doc.views.len(), 1);
        let view = &doc.views[0];
        assert_eq!(view.name, "ActiveCustomers");
        assert_eq!(view.sql_file, "views/active_customers.sql");
        assert!(view.generate_partial);
        assert_eq!(view.applications, vec!["Sales"]);
        assert_eq!(view.parameters[0].field_type, "datetime");
        assert!(view.parameters[0].validation.as_ref().unwrap().required);
        assert_eq!(view.properties[0].name, "CustomerId");
    }

    #[test]
    fn test_values_are_not_recased() {
        let yaml = "Views:\n  - Name: Order_Totals\n    SqlFile: Some_File.sql\n";
        let doc: ViewsDocument = from_yaml_str(yaml, NamingConvention::PascalCase).unwrap();
        assert_eq!(doc.views[0].name, "Order_Totals");
        assert_eq!(doc.views[0].sql_file, "Some_File.sql");
    }

    #[test]
    fn test_write_in_pascal_case() {
        let doc = ViewsDocument {
            views: vec![ViewDefinition {
                name: "Totals".to_string(),
                sql_file: "totals.sql".to_string(),
                generate_partial: true,
                ..Default::default()
            }],
        };

        let yaml = to_yaml_string(&doc, NamingConvention::PascalCase).unwrap();
        assert!(yaml.contains("Views:"));
        assert!(yaml.contains("SqlFile: totals.sql"));
        assert!(yaml.contains("GeneratePartial: true"));

        let camel = to_yaml_string(&doc, NamingConvention::CamelCase).unwrap();
        assert!(camel.contains("sqlFile: totals.sql"));
    }

    #[test]
    fn test_schema_round_trip_across_conventions() {
        let schema = CanonicalSchema {
            entities: vec![Entity {
                name: "Product".to_string(),
                table: "Products".to_string(),
                properties: vec![Property {
                    name: "Price".to_string(),
                    canonical_type: CanonicalType::Decimal,
                    is_primary_key: false,
                    is_identity: false,
                    is_required: true,
                    max_length: None,
                    precision: Some(18),
                    scale: Some(2),
                    default_value: None,
                }],
                ..Default::default()
            }],
        };

        for convention in [
            NamingConvention::SnakeCase,
            NamingConvention::PascalCase,
            NamingConvention::CamelCase,
        ] {
            let yaml = to_yaml_string(&schema, convention).unwrap();
            let back: CanonicalSchema = from_yaml_str(&yaml, convention).unwrap();
            assert_eq!(back, schema, "round trip failed for {}", convention);
        }
    }

    #[test]
    fn test_empty_document_reads_as_default() {
        let doc: ViewsDocument = from_yaml_str("", NamingConvention::SnakeCase).unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_missing_optional_document() {
        let source = DocumentSource::new("/nonexistent/views.yaml", NamingConvention::PascalCase);
        assert!(load_views(Some(&source)).unwrap().is_none());
        assert!(load_views(None).unwrap().is_none());
    }

    #[test]
    fn test_save_and_load_schema_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let target = DocumentSource::new(
            temp_dir.path().join("nested/schema.yaml"),
            NamingConvention::CamelCase,
        );
        let schema = CanonicalSchema {
            entities: vec![Entity {
                name: "Category".to_string(),
                table: "Categories".to_string(),
                ..Default::default()
            }],
        };

        save_schema(&schema, &target).unwrap();
        assert_eq!(load_schema(&target).unwrap(), schema);
    }

    #[test]
    fn test_wrong_convention_is_rejected() {
        let yaml = "Views:\n  - Name: Totals\n    SqlFile: totals.sql\n";

        let err = from_yaml_str::<ViewsDocument>(yaml, NamingConvention::SnakeCase).unwrap_err();
        assert!(err.to_string().contains("Views"));
        assert!(from_yaml_str::<MergedDocument>(yaml, NamingConvention::SnakeCase).is_err());

        let merged: MergedDocument = from_yaml_str(yaml, NamingConvention::PascalCase).unwrap();
        assert_eq!(merged.views.len(), 1);
    }

    #[test]
    fn test_snake_case_document_reads_under_pascal_convention() {
        let yaml = "views:\n  - name: Totals\n    sql_file: totals.sql\n    generate_partial: true\n";
        let doc: ViewsDocument = from_yaml_str(yaml, NamingConvention::PascalCase).unwrap();
        assert_eq!(doc.views[0].sql_file, "totals.sql");
        assert!(doc.views[0].generate_partial);
    }

    #[test]
    fn test_pascal_views_file_read_as_snake_case_fails_with_path() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("views.yaml");
        std::fs::write(&path, "Views:\n  - Name: Totals\n").unwrap();

        let err = load_merged(&DocumentSource::new(&path, NamingConvention::SnakeCase)).unwrap_err();
        assert!(matches!(err, Error::Yaml { ref path, .. } if path.ends_with("views.yaml")));
    }

    #[test]
    fn test_convention_from_str() {
        assert_eq!("PascalCase".parse::<NamingConvention>().unwrap(), NamingConvention::PascalCase);
        assert_eq!("pascal-case".parse::<NamingConvention>().unwrap(), NamingConvention::PascalCase);
        assert_eq!("snake".parse::<NamingConvention>().unwrap(), NamingConvention::SnakeCase);
        assert!("kebab".parse::<NamingConvention>().is_err());
    }
}
