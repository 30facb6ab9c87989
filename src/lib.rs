//! # schemagen: schema-driven data-access code generation
//!
//! schemagen reads a relational DDL script, builds a language-neutral schema
//! model from it, merges that model with hand-authored view definitions and
//! per-application visibility lists, and renders source files from templates.
//!
//! ## Pipeline
//!
//! 1. [`ddl`]: `CREATE TABLE` statements to flat table metadata
//! 2. [`schema`]: table metadata to entities, properties and relationships
//! 3. [`codegen::merge`]: schema + views + applications to one merged document
//! 4. [`codegen::generator`]: merged document + templates to source files
//!
//! ## Example: schema document
//!
//! ```yaml
//! entities:
//!   - name: Product
//!     table: Products
//!     properties:
//!       - name: Id
//!         type: int
//!         is_primary_key: true
//!         is_identity: true
//!         is_required: true
//!       - name: CategoryId
//!         type: int
//!         is_primary_key: false
//!         is_identity: false
//!         is_required: true
//!     relationships:
//!       - type: one-to-many
//!         target_entity: Category
//!         foreign_key: CategoryId
//!         principal_key: Id
//! ```

// SQL DDL ingestion
pub mod ddl;

// Canonical schema model
pub mod schema;

// Documents, merge and code generation
pub mod codegen;

pub mod error;

// Re-export key types
pub use ddl::{parse_ddl, CanonicalType, DdlParser, SqlServerDdlParser, TableMetadata};
pub use schema::{build_schema, CanonicalSchema, Entity, Property, Relationship};
pub use codegen::{merge, CodeGenerator, GeneratorOptions, MergedDocument, NamingConvention};
pub use error::{Error, ParseDiagnostic, ParseError, Result};
