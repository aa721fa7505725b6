//! Schema graph building and enrichment for schemaboil.
//!
//! This crate provides:
//! - The enriched `Table` model with derived to-many `Relationship`s
//! - Join table classification
//! - Foreign key constraint propagation across tables
//! - Relationship derivation, including through many-to-many join tables
//! - `build_schema`, which fetches every table from a `SchemaAccessor` and
//!   enriches the complete set
//! - `BuildConfig` for table filtering and inconsistency handling

pub mod build;
pub mod config;
pub mod enrich;
pub mod table;

pub use build::{RawSchema, SchemaBuild, build_schema, fetch_table, fetch_tables};
pub use config::{BuildConfig, ConsistencyMode, TableFilter};
pub use enrich::{
    PropagatedKeys, classify_join_table, derive_relationships, enrich, is_join_table,
    propagate_foreign_key_constraints,
};
pub use table::{JoinLeg, Relationship, Table, get_table};
