//! Schemaboil - database schema metadata enrichment for code generators.
//!
//! Schemaboil takes the raw metadata a database driver can introspect
//! (tables, columns, primary keys, foreign keys) and produces a
//! cross-referenced schema graph:
//!
//! - Join tables are recognized from their key structure
//! - Foreign keys learn the nullability and uniqueness of both of their columns
//! - Every table lists the to-many relationships pointing at it, including
//!   the far side of many-to-many associations through join tables
//!
//! # Quick Start
//!
//! ```ignore
//! use schemaboil::prelude::*;
//!
//! async fn generate(cx: &Cx, accessor: &impl SchemaAccessor) {
//!     let config = BuildConfig::new().exclude("schema_migrations");
//!
//!     let build = match build_schema(cx, accessor, &config).await {
//!         Outcome::Ok(build) => build,
//!         Outcome::Err(e) => panic!("schema build failed: {e}"),
//!         Outcome::Cancelled(_) | Outcome::Panicked(_) => return,
//!     };
//!
//!     for warning in &build.warnings {
//!         eprintln!("warning: {warning}");
//!     }
//!
//!     for table in &build.tables {
//!         for rel in &table.to_many_relationships {
//!             println!("{}.{} <- {}.{}", table.name, rel.column, rel.foreign_table, rel.foreign_column);
//!         }
//!     }
//! }
//! ```
//!
//! Drivers implement [`SchemaAccessor`]; [`MemoryAccessor`] serves fixtures
//! from memory for tests.

// Re-export asupersync primitives
pub use asupersync::{Cx, Outcome};

pub use schemaboil_core::{
    AccessorCall, AccessorError, Column, ConfigError, Dialect, Error, ForeignKey,
    InconsistencyKind, InconsistencyReport, MemoryAccessor, MemoryTable, ParsedSqlType,
    PrimaryKey, Result, SchemaAccessor, SchemaInconsistency, column_names,
    driver_uses_last_insert_id, filter_columns_by_default, translate, translate_column,
};
pub use schemaboil_schema::{
    BuildConfig, ConsistencyMode, JoinLeg, RawSchema, Relationship, SchemaBuild, Table,
    TableFilter, build_schema, classify_join_table, derive_relationships, enrich, fetch_table,
    fetch_tables, get_table, is_join_table, propagate_foreign_key_constraints,
};

/// Prelude module for convenient imports.
///
/// ```ignore
/// use schemaboil::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BuildConfig, Column, ConsistencyMode, Cx, Dialect, Error, ForeignKey, JoinLeg, Outcome,
        PrimaryKey, Relationship, Result, SchemaAccessor, SchemaBuild, SchemaInconsistency,
        Table, build_schema, driver_uses_last_insert_id,
    };
}
