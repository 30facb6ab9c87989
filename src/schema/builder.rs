//! Conversion of parsed tables into the canonical schema model.

use tracing::debug;

use super::model::{CanonicalSchema, Entity, Property, Relationship, ONE_TO_MANY};
use super::naming::singularize;
use crate::ddl::{sql_to_canonical, ColumnMetadata, ForeignKeyMetadata, TableMetadata};

/// Build the canonical schema, one entity per table, in script order
pub fn build_schema(tables: &[TableMetadata]) -> CanonicalSchema {
    let entities = tables.iter().map(build_entity).collect();
    CanonicalSchema { entities }
}

fn build_entity(table: &TableMetadata) -> Entity {
    let entity = Entity {
        name: singularize(&table.name),
        schema: table.schema.clone(),
        table: table.name.clone(),
        properties: table.columns.iter().map(build_property).collect(),
        relationships: table.foreign_keys.iter().map(build_relationship).collect(),
    };

    debug!(
        "Built entity {} from table {} ({} properties, {} relationships)",
        entity.name,
        table.name,
        entity.properties.len(),
        entity.relationships.len()
    );

    entity
}

fn build_property(column: &ColumnMetadata) -> Property {
    Property {
        name: column.name.clone(),
        canonical_type: sql_to_canonical(&column.sql_type),
        is_primary_key: column.is_primary_key,
        is_identity: column.is_identity,
        is_required: !column.is_nullable,
        max_length: column.max_length,
        precision: column.precision,
        scale: column.scale,
        default_value: column.default_value.clone(),
    }
}

fn build_relationship(fk: &ForeignKeyMetadata) -> Relationship {
    Relationship {
        kind: ONE_TO_MANY.to_string(),
        target_entity: singularize(&fk.referenced_table),
        foreign_key: fk.column.clone(),
        principal_key: fk.referenced_column.clone(),
    }
}
