//! Template loading and the custom Tera filters available to templates.
//!
//! Filters:
//! - `target_type(nullable=false)`: canonical or SQL type name to C# type
//! - `binding_type`: canonical or SQL type name to `DbType` member
//! - `pascal_case`, `camel_case`, `snake_case`
//! - `csharp_string`: escape for a C# string literal
//! - `doc_line`: collapse text onto one `///` comment line

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tera::Tera;

use crate::codegen::utils::{
    doc_comment_line, escape_csharp_string, to_camel_case, to_pascal_case, to_snake_case,
};
use crate::ddl::{canonical_to_binding_type, canonical_to_target_type, CanonicalType};
use crate::error::{Error, Result};

pub const ENTITY_TEMPLATE: &str = "entity";
pub const VIEW_TEMPLATE: &str = "view";

/// Template files for each kind of generated source
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TemplateSet {
    pub entity: PathBuf,
    pub view: PathBuf,
}

impl TemplateSet {
    /// `entity.cs.tera` and `view.cs.tera` inside `dir`
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            entity: dir.join("entity.cs.tera"),
            view: dir.join("view.cs.tera"),
        }
    }
}

/// Build a Tera instance holding the named template files.
///
/// Any missing file fails the whole load.
pub fn load_engine(templates: &[(&str, &Path)]) -> Result<Tera> {
    let mut tera = Tera::default();

    for (name, path) in templates {
        if !path.is_file() {
            return Err(Error::MissingTemplate(path.to_path_buf()));
        }
        let source = fs::read_to_string(path).map_err(|e| Error::io(*path, e))?;
        tera.add_raw_template(name, &source)?;
    }

    register_filters(&mut tera);
    Ok(tera)
}

/// Register the schemagen filters on an engine
pub fn register_filters(tera: &mut Tera) {
    tera.register_filter("target_type", target_type_filter);
    tera.register_filter("binding_type", binding_type_filter);
    tera.register_filter("pascal_case", |v: &Value, _: &HashMap<String, Value>| {
        map_str(v, "pascal_case", to_pascal_case)
    });
    tera.register_filter("camel_case", |v: &Value, _: &HashMap<String, Value>| {
        map_str(v, "camel_case", to_camel_case)
    });
    tera.register_filter("snake_case", |v: &Value, _: &HashMap<String, Value>| {
        map_str(v, "snake_case", to_snake_case)
    });
    tera.register_filter("csharp_string", |v: &Value, _: &HashMap<String, Value>| {
        map_str(v, "csharp_string", escape_csharp_string)
    });
    tera.register_filter("doc_line", |v: &Value, _: &HashMap<String, Value>| {
        map_str(v, "doc_line", doc_comment_line)
    });
}

fn map_str(value: &Value, filter: &str, f: impl Fn(&str) -> String) -> tera::Result<Value> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("Filter `{}` expects a string", filter)))?;
    Ok(Value::String(f(s)))
}

fn target_type_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let name = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("Filter `target_type` expects a type name"))?;
    let nullable = args.get("nullable").and_then(Value::as_bool).unwrap_or(false);
    Ok(Value::String(canonical_to_target_type(
        CanonicalType::resolve(name),
        nullable,
    )))
}

fn binding_type_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let name = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("Filter `binding_type` expects a type name"))?;
    Ok(Value::String(
        canonical_to_binding_type(CanonicalType::resolve(name)).to_string(),
    ))
}
