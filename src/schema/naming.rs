//! Name normalization for entities and output locations.

/// Schema whose entities are written at the output root
pub const DEFAULT_SCHEMA: &str = "dbo";

/// Singularize a table name with a plain suffix rule.
///
/// `ies` becomes `y`, then `es` and `s` are dropped. Irregular plurals and
/// words that already end in `s` are transformed all the same
/// (`Series` -> `Sery`, `Status` -> `Statu`).
pub fn singularize(name: &str) -> String {
    if let Some(stem) = name.strip_suffix("ies") {
        format!("{}y", stem)
    } else if let Some(stem) = name.strip_suffix("es") {
        stem.to_string()
    } else if let Some(stem) = name.strip_suffix('s') {
        stem.to_string()
    } else {
        name.to_string()
    }
}

/// Upper-case the first character, leaving the rest untouched
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Output subdirectory for a schema, or `None` for the default schema
pub fn schema_directory(schema: Option<&str>, default_schema: &str) -> Option<String> {
    match schema {
        Some(s) if !s.is_empty() && !s.eq_ignore_ascii_case(default_schema) => {
            Some(capitalize_first(s))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singularize_regular_plurals() {
        assert_eq!(singularize("Categories"), "Category");
        assert_eq!(singularize("Products"), "Product");
        assert_eq!(singularize("CompanyProducts"), "CompanyProduct");
        assert_eq!(singularize("Boxes"), "Box");
    }

    #[test]
    fn test_singularize_leaves_singular_names() {
        assert_eq!(singularize("Person"), "Person");
        assert_eq!(singularize("Inventory"), "Inventory");
        assert_eq!(singularize(""), "");
    }

    #[test]
    fn test_singularize_is_lossy_for_irregular_words() {
        // Suffix rule only; no exception list
        assert_eq!(singularize("Series"), "Sery");
        assert_eq!(singularize("Status"), "Statu");
        assert_eq!(singularize("Houses"), "Hous");
    }

    #[test]
    fn test_schema_directory() {
        assert_eq!(schema_directory(None, DEFAULT_SCHEMA), None);
        assert_eq!(schema_directory(Some("dbo"), DEFAULT_SCHEMA), None);
        assert_eq!(schema_directory(Some("DBO"), DEFAULT_SCHEMA), None);
        assert_eq!(schema_directory(Some("sales"), DEFAULT_SCHEMA), Some("Sales".to_string()));
        assert_eq!(schema_directory(Some("hrData"), DEFAULT_SCHEMA), Some("HrData".to_string()));
    }
}
