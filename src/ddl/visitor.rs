//! AST visitor that turns `CREATE TABLE` statements into [`TableMetadata`].

use std::ops::ControlFlow;

use sqlparser::ast::{
    CharacterLength, ColumnDef, ColumnOption, CreateTable, DataType, ExactNumberInfo, Expr,
    Ident, ObjectName, Statement, TableConstraint, Visit, Visitor,
};
use tracing::debug;

use super::metadata::{ColumnMetadata, ForeignKeyMetadata, TableMetadata};
use super::type_mapper::{type_category, TypeCategory};

/// Referenced column assumed when a foreign key omits it
pub const DEFAULT_REFERENCED_COLUMN: &str = "Id";

/// Collects one [`TableMetadata`] per `CREATE TABLE` statement it visits
#[derive(Debug, Default)]
pub struct TableCollector {
    tables: Vec<TableMetadata>,
}

impl TableCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk every statement and return the collected tables in script order
    pub fn collect(statements: &[Statement]) -> Vec<TableMetadata> {
        let mut collector = Self::new();
        for statement in statements {
            // Break is uninhabited in practice; the collector always continues
            let _ = statement.visit(&mut collector);
        }
        collector.into_tables()
    }

    pub fn into_tables(self) -> Vec<TableMetadata> {
        self.tables
    }
}

impl Visitor for TableCollector {
    type Break = ();

    fn pre_visit_statement(&mut self, statement: &Statement) -> ControlFlow<Self::Break> {
        match statement {
            Statement::CreateTable(create_table) => {
                let table = table_from_create(create_table);
                debug!(
                    table = %table.name,
                    schema = ?table.schema,
                    columns = table.columns.len(),
                    foreign_keys = table.foreign_keys.len(),
                    "Visited CREATE TABLE"
                );
                self.tables.push(table);
            }
            _ => debug!("Ignoring statement that is not CREATE TABLE"),
        }
        ControlFlow::Continue(())
    }
}

fn table_from_create(create_table: &CreateTable) -> TableMetadata {
    let (schema, name) = split_qualified_name(&create_table.name);

    let mut table = TableMetadata {
        name,
        schema,
        columns: Vec::with_capacity(create_table.columns.len()),
        foreign_keys: Vec::new(),
    };

    for column_def in &create_table.columns {
        let (column, inline_fk) = column_from_def(column_def);
        if let Some(fk) = inline_fk {
            table.foreign_keys.push(fk);
        }
        table.columns.push(column);
    }

    for constraint in &create_table.constraints {
        apply_table_constraint(&mut table, constraint);
    }

    table
}

/// Split a possibly qualified name into (schema, object).
///
/// The last segment is the object; the segment before it, if any, is the schema.
fn split_qualified_name(name: &ObjectName) -> (Option<String>, String) {
    match name.0.as_slice() {
        [] => (None, String::new()),
        [only] => (None, only.value.clone()),
        [.., schema, object] => (Some(schema.value.clone()), object.value.clone()),
    }
}

fn column_from_def(column_def: &ColumnDef) -> (ColumnMetadata, Option<ForeignKeyMetadata>) {
    let sql_type = base_type_name(&column_def.data_type);
    let mut column = ColumnMetadata::new(column_def.name.value.clone(), sql_type);
    let mut inline_fk = None;

    match type_category(&column.sql_type) {
        TypeCategory::String => {
            column.max_length = extract_length(&column_def.data_type);
        }
        TypeCategory::Decimal => {
            let (precision, scale) = extract_precision_scale(&column_def.data_type);
            column.precision = precision;
            column.scale = scale;
        }
        TypeCategory::Other => {}
    }

    for option_def in &column_def.options {
        match &option_def.option {
            ColumnOption::NotNull => column.is_nullable = false,
            ColumnOption::Null => column.is_nullable = true,
            ColumnOption::Default(expr) => column.default_value = Some(default_value_text(expr)),
            ColumnOption::Unique { is_primary, .. } => {
                if *is_primary {
                    mark_primary_key(&mut column);
                }
            }
            ColumnOption::ForeignKey {
                foreign_table,
                referred_columns,
                ..
            } => {
                inline_fk = Some(foreign_key(
                    &column.name,
                    foreign_table,
                    referred_columns,
                ));
            }
            other if is_identity_option(other) => column.is_identity = true,
            _ => {}
        }
    }

    (column, inline_fk)
}

/// SQL Server makes key columns NOT NULL whether or not the DDL says so
fn mark_primary_key(column: &mut ColumnMetadata) {
    column.is_primary_key = true;
    column.is_nullable = false;
}

fn is_identity_option(option: &ColumnOption) -> bool {
    let text = option.to_string().to_uppercase();
    text.starts_with("IDENTITY") || text == "AUTO_INCREMENT" || text == "AUTOINCREMENT"
}

fn apply_table_constraint(table: &mut TableMetadata, constraint: &TableConstraint) {
    match constraint {
        TableConstraint::PrimaryKey { columns, .. } => {
            for ident in columns {
                if let Some(column) = table.column_mut(&ident.value) {
                    mark_primary_key(column);
                }
            }
        }
        TableConstraint::ForeignKey {
            columns,
            foreign_table,
            referred_columns,
            ..
        } => {
            // Composite keys are not supported: only the first column is kept
            if let Some(first) = columns.first() {
                table
                    .foreign_keys
                    .push(foreign_key(&first.value, foreign_table, referred_columns));
            }
        }
        _ => {}
    }
}

fn foreign_key(column: &str, foreign_table: &ObjectName, referred_columns: &[Ident]) -> ForeignKeyMetadata {
    let (referenced_schema, referenced_table) = split_qualified_name(foreign_table);
    let referenced_column = referred_columns
        .first()
        .map(|c| c.value.clone())
        .unwrap_or_else(|| DEFAULT_REFERENCED_COLUMN.to_string());

    ForeignKeyMetadata {
        column: column.to_string(),
        referenced_table,
        referenced_schema,
        referenced_column,
    }
}

/// Type name without its parameter list, e.g. `NVARCHAR(100)` -> `NVARCHAR`.
///
/// Bracket-quoted names such as `[decimal](18, 2)` reach us as custom types;
/// the unquoted last segment is the type name.
fn base_type_name(data_type: &DataType) -> String {
    if let DataType::Custom(name, _) = data_type {
        if let Some(last) = name.0.last() {
            return last.value.clone();
        }
    }

    let text = data_type.to_string();
    let name = match text.find('(') {
        Some(idx) => &text[..idx],
        None => text.as_str(),
    };
    name.trim().trim_matches(|c| c == '[' || c == ']' || c == '"').to_string()
}

/// Arguments of the rendered type, e.g. `DECIMAL(18,2)` -> `["18", "2"]`
fn type_arguments(data_type: &DataType) -> Vec<String> {
    if let DataType::Custom(_, modifiers) = data_type {
        return modifiers.iter().map(|m| m.trim().to_string()).collect();
    }

    let text = data_type.to_string();
    match (text.find('('), text.rfind(')')) {
        (Some(open), Some(close)) if close > open => text[open + 1..close]
            .split(',')
            .map(|arg| arg.trim().to_string())
            .filter(|arg| !arg.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn extract_length(data_type: &DataType) -> Option<u32> {
    match data_type {
        DataType::Varchar(len) | DataType::Char(len) | DataType::Nvarchar(len) => {
            len.as_ref().and_then(|l| match l {
                CharacterLength::IntegerLength { length, .. } => u32::try_from(*length).ok(),
                CharacterLength::Max => None,
            })
        }
        // NCHAR, VARBINARY and friends render their length verbatim
        _ => type_arguments(data_type)
            .first()
            .and_then(|arg| arg.parse::<u32>().ok()),
    }
}

fn extract_precision_scale(data_type: &DataType) -> (Option<u8>, Option<u8>) {
    match data_type {
        DataType::Decimal(info) | DataType::Numeric(info) => match info {
            ExactNumberInfo::None => (None, None),
            ExactNumberInfo::Precision(p) => (u8::try_from(*p).ok(), None),
            ExactNumberInfo::PrecisionAndScale(p, s) => {
                (u8::try_from(*p).ok(), u8::try_from(*s).ok())
            }
        },
        _ => {
            let args = type_arguments(data_type);
            let precision = args.first().and_then(|a| a.parse::<u8>().ok());
            let scale = args.get(1).and_then(|a| a.parse::<u8>().ok());
            (precision, scale)
        }
    }
}

/// Literal defaults are kept verbatim (string quotes removed); function calls
/// keep only the function name.
fn default_value_text(expr: &Expr) -> String {
    match expr {
        Expr::Nested(inner) => default_value_text(inner),
        Expr::Function(function) => function.name.to_string(),
        other => unquote(&other.to_string()),
    }
}

fn unquote(text: &str) -> String {
    let body = text.strip_prefix('N').filter(|rest| rest.starts_with('\'')).unwrap_or(text);
    if body.len() >= 2 && body.starts_with('\'') && body.ends_with('\'') {
        body[1..body.len() - 1].replace("''", "'")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracketed_type_names() {
        let custom = |name: &str, modifiers: &[&str]| {
            DataType::Custom(
                ObjectName(vec![Ident::with_quote('[', name)]),
                modifiers.iter().map(|m| m.to_string()).collect(),
            )
        };

        assert_eq!(base_type_name(&custom("int", &[])), "int");
        let decimal = custom("decimal", &["18", "2"]);
        assert_eq!(base_type_name(&decimal), "decimal");
        assert_eq!(extract_precision_scale(&decimal), (Some(18), Some(2)));
        assert_eq!(extract_length(&custom("nvarchar", &["100"])), Some(100));
        assert_eq!(extract_length(&custom("nvarchar", &["max"])), None);
    }

    #[test]
    fn test_unquote_literals() {
        assert_eq!(unquote("'active'"), "active");
        assert_eq!(unquote("N'O''Brien'"), "O'Brien");
        assert_eq!(unquote("0"), "0");
        assert_eq!(unquote("-1.5"), "-1.5");
        assert_eq!(unquote("NULL"), "NULL");
    }
}
