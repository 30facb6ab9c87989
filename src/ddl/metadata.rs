//! Flat records produced by the DDL visitor, one per `CREATE TABLE`.

/// One parsed `CREATE TABLE` statement
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableMetadata {
    pub name: String,
    /// First segment of a qualified name, if the name was qualified
    pub schema: Option<String>,
    pub columns: Vec<ColumnMetadata>,
    pub foreign_keys: Vec<ForeignKeyMetadata>,
}

impl TableMetadata {
    pub fn column(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub(crate) fn column_mut(&mut self, name: &str) -> Option<&mut ColumnMetadata> {
        self.columns.iter_mut().find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

/// One column definition
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMetadata {
    pub name: String,
    /// Bare SQL type name, e.g. `NVARCHAR`
    pub sql_type: String,
    /// Absent for `(MAX)` and for types without a length
    pub max_length: Option<u32>,
    pub precision: Option<u8>,
    pub scale: Option<u8>,
    pub is_nullable: bool,
    pub is_primary_key: bool,
    pub is_identity: bool,
    pub default_value: Option<String>,
}

impl ColumnMetadata {
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            max_length: None,
            precision: None,
            scale: None,
            is_nullable: true,
            is_primary_key: false,
            is_identity: false,
            default_value: None,
        }
    }
}

/// Single-column foreign key. Composite keys keep only their first column.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKeyMetadata {
    pub column: String,
    pub referenced_table: String,
    pub referenced_schema: Option<String>,
    pub referenced_column: String,
}
