//! Canonical schema model and its construction from parsed DDL.

pub mod builder;
pub mod model;
pub mod naming;

pub use builder::build_schema;
pub use model::{CanonicalSchema, Entity, Property, Relationship, ONE_TO_MANY};
pub use naming::{capitalize_first, schema_directory, singularize, DEFAULT_SCHEMA};
