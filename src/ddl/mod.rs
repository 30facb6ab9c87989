//! SQL DDL ingestion.
//!
//! `CREATE TABLE` statements are parsed with a third-party grammar and flattened
//! into [`TableMetadata`] records. Nothing outside this module sees the AST.

pub mod metadata;
pub mod parser;
pub mod preprocess;
pub mod type_mapper;
pub mod visitor;

pub use metadata::{ColumnMetadata, ForeignKeyMetadata, TableMetadata};
pub use parser::{parse_ddl, DdlParser, SqlServerDdlParser};
pub use type_mapper::{
    canonical_to_binding_type, canonical_to_target_type, sql_to_canonical, type_category,
    CanonicalType, TypeCategory,
};
