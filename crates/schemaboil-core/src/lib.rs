//! Core types and traits for schemaboil.
//!
//! This crate provides the driver-facing half of schema building:
//!
//! - `SchemaAccessor` trait implemented by database drivers
//! - Raw `Column`, `PrimaryKey` and `ForeignKey` records
//! - Error types, including non-fatal `SchemaInconsistency` records
//! - Static driver capabilities (`Dialect`, `driver_uses_last_insert_id`)
//! - Native type parsing and default type translators
//! - `MemoryAccessor` for fixtures and tests
//! - `Outcome` re-export from asupersync for cancel-correct operations

// Re-export asupersync primitives for structured concurrency
pub use asupersync::{Cx, Outcome};

pub mod accessor;
pub mod driver;
pub mod error;
pub mod memory;
pub mod model;
pub mod types;

pub use accessor::SchemaAccessor;
pub use driver::{Dialect, driver_uses_last_insert_id};
pub use error::{
    AccessorCall, AccessorError, ConfigError, Error, InconsistencyKind, InconsistencyReport,
    Result, SchemaInconsistency,
};
pub use memory::{MemoryAccessor, MemoryTable};
pub use model::{Column, ForeignKey, PrimaryKey, column_names, filter_columns_by_default};
pub use types::{ParsedSqlType, translate, translate_column};
