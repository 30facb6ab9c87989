//! SQL type classification.
//!
//! Maps SQL Server type names onto the closed [`CanonicalType`] set, and from
//! there onto C# type names and `DbType` binding tags for the generated
//! data-access code. Every function here is total.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language-agnostic property type. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalType {
    Int,
    Long,
    Short,
    Byte,
    Decimal,
    Double,
    Float,
    DateTime,
    DateTimeOffset,
    TimeSpan,
    Bool,
    Guid,
    Bytes,
    String,
}

impl CanonicalType {
    pub const ALL: [CanonicalType; 14] = [
        CanonicalType::Int,
        CanonicalType::Long,
        CanonicalType::Short,
        CanonicalType::Byte,
        CanonicalType::Decimal,
        CanonicalType::Double,
        CanonicalType::Float,
        CanonicalType::DateTime,
        CanonicalType::DateTimeOffset,
        CanonicalType::TimeSpan,
        CanonicalType::Bool,
        CanonicalType::Guid,
        CanonicalType::Bytes,
        CanonicalType::String,
    ];

    /// Name as written in schema documents
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalType::Int => "int",
            CanonicalType::Long => "long",
            CanonicalType::Short => "short",
            CanonicalType::Byte => "byte",
            CanonicalType::Decimal => "decimal",
            CanonicalType::Double => "double",
            CanonicalType::Float => "float",
            CanonicalType::DateTime => "datetime",
            CanonicalType::DateTimeOffset => "datetimeoffset",
            CanonicalType::TimeSpan => "timespan",
            CanonicalType::Bool => "bool",
            CanonicalType::Guid => "guid",
            CanonicalType::Bytes => "bytes",
            CanonicalType::String => "string",
        }
    }

    /// Whether the target type is a value type that needs an explicit nullable marker
    pub fn is_value_type(&self) -> bool {
        !matches!(self, CanonicalType::String | CanonicalType::Bytes)
    }

    /// Resolve an authored type name.
    ///
    /// Canonical names are taken as is; anything else is treated as a SQL type
    /// name and classified with [`sql_to_canonical`].
    pub fn resolve(name: &str) -> CanonicalType {
        name.parse()
            .unwrap_or_else(|_| sql_to_canonical(name))
    }
}

impl fmt::Display for CanonicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        CanonicalType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == lowered)
            .ok_or_else(|| format!("Unknown canonical type: '{}'", s))
    }
}

/// Which type parameters a SQL type carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    /// Single length parameter, e.g. `NVARCHAR(100)`
    String,
    /// Precision and optional scale, e.g. `DECIMAL(18,2)`
    Decimal,
    /// No parameters captured
    Other,
}

/// Map a SQL type name to its canonical type.
///
/// Matching is case-insensitive and by exact name. Unknown names map to
/// [`CanonicalType::String`].
pub fn sql_to_canonical(sql_type: &str) -> CanonicalType {
    match sql_type.trim().to_lowercase().as_str() {
        "int" | "integer" => CanonicalType::Int,
        "bigint" => CanonicalType::Long,
        "smallint" => CanonicalType::Short,
        "tinyint" => CanonicalType::Byte,

        "decimal" | "numeric" | "money" | "smallmoney" => CanonicalType::Decimal,

        "float" => CanonicalType::Double,
        "real" => CanonicalType::Float,

        "date" | "datetime" | "datetime2" | "smalldatetime" => CanonicalType::DateTime,
        "time" => CanonicalType::TimeSpan,
        "datetimeoffset" => CanonicalType::DateTimeOffset,

        "varchar" | "nvarchar" | "char" | "nchar" | "text" | "ntext" | "xml" => {
            CanonicalType::String
        }

        // timestamp/rowversion is a row-version marker, not a point in time
        "varbinary" | "binary" | "image" | "timestamp" | "rowversion" => CanonicalType::Bytes,

        "bit" => CanonicalType::Bool,
        "uniqueidentifier" => CanonicalType::Guid,

        // geography, geometry, hierarchyid, sql_variant and anything unrecognised
        _ => CanonicalType::String,
    }
}

/// Parameter category of a SQL type name
pub fn type_category(sql_type: &str) -> TypeCategory {
    match sql_type.trim().to_lowercase().as_str() {
        "varchar" | "nvarchar" | "char" | "nchar" | "varbinary" | "binary" => TypeCategory::String,
        "decimal" | "numeric" => TypeCategory::Decimal,
        _ => TypeCategory::Other,
    }
}

/// C# type name for a canonical type. Value types get a `?` when nullable.
pub fn canonical_to_target_type(canonical: CanonicalType, nullable: bool) -> String {
    let base = match canonical {
        CanonicalType::Int => "int",
        CanonicalType::Long => "long",
        CanonicalType::Short => "short",
        CanonicalType::Byte => "byte",
        CanonicalType::Decimal => "decimal",
        CanonicalType::Double => "double",
        CanonicalType::Float => "float",
        CanonicalType::DateTime => "DateTime",
        CanonicalType::DateTimeOffset => "DateTimeOffset",
        CanonicalType::TimeSpan => "TimeSpan",
        CanonicalType::Bool => "bool",
        CanonicalType::Guid => "Guid",
        CanonicalType::Bytes => "byte[]",
        CanonicalType::String => "string",
    };

    if nullable && canonical.is_value_type() {
        format!("{}?", base)
    } else {
        base.to_string()
    }
}

/// `DbType` member used when binding a parameter of this type
pub fn canonical_to_binding_type(canonical: CanonicalType) -> &'static str {
    match canonical {
        CanonicalType::Int => "DbType.Int32",
        CanonicalType::Long => "DbType.Int64",
        CanonicalType::Short => "DbType.Int16",
        CanonicalType::Byte => "DbType.Byte",
        CanonicalType::Decimal => "DbType.Decimal",
        CanonicalType::Double => "DbType.Double",
        CanonicalType::Float => "DbType.Single",
        CanonicalType::DateTime => "DbType.DateTime2",
        CanonicalType::DateTimeOffset => "DbType.DateTimeOffset",
        CanonicalType::TimeSpan => "DbType.Time",
        CanonicalType::Bool => "DbType.Boolean",
        CanonicalType::Guid => "DbType.Guid",
        CanonicalType::Bytes => "DbType.Binary",
        CanonicalType::String => "DbType.String",
    }
}
