//! Schema building from a [`SchemaAccessor`].
//!
//! Building runs as two explicit phases:
//!
//! 1. Fetch: every table's columns, primary key and foreign keys are read
//!    from the accessor and assembled into raw [`Table`] records. Any
//!    accessor failure aborts the build; no partial schema is returned.
//! 2. Enrich: once every table is in memory, [`enrich`] runs its passes
//!    over the complete slice.

use crate::config::{BuildConfig, TableFilter};
use crate::enrich::enrich;
use crate::table::{Table, get_table};
use asupersync::{Cx, Outcome};
use schemaboil_core::accessor::SchemaAccessor;
use schemaboil_core::error::{AccessorCall, Error, InconsistencyReport, SchemaInconsistency};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The result of a successful build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaBuild {
    /// Enriched tables, in fetch order
    pub tables: Vec<Table>,
    /// Non-fatal inconsistencies found in the accessor output
    pub warnings: Vec<SchemaInconsistency>,
}

impl SchemaBuild {
    /// Get a table by name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        get_table(&self.tables, name)
    }

    /// Whether the accessor output was fully consistent.
    pub fn is_consistent(&self) -> bool {
        self.warnings.is_empty()
    }

    /// All join tables.
    pub fn join_tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter().filter(|t| t.is_join_table)
    }

    /// Serialize the enriched schema for an out-of-process generator.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serde(e.to_string()))
    }

    /// Read back a schema written by [`SchemaBuild::to_json`].
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::Serde(e.to_string()))
    }
}

/// Raw tables as fetched, before enrichment.
#[derive(Debug, Clone, Default)]
pub struct RawSchema {
    pub tables: Vec<Table>,
    pub inconsistencies: Vec<SchemaInconsistency>,
}

/// Build the enriched schema from an accessor.
///
/// The accessor is opened first and closed once fetching is over, whether
/// it succeeded, failed, or was cancelled. In strict mode any recorded
/// inconsistency fails the build with [`Error::Inconsistency`].
#[tracing::instrument(level = "info", skip(cx, accessor, config))]
pub async fn build_schema<A: SchemaAccessor>(
    cx: &Cx,
    accessor: &A,
    config: &BuildConfig,
) -> Outcome<SchemaBuild, Error> {
    let filter = match config.compile() {
        Ok(filter) => filter,
        Err(e) => return Outcome::Err(e),
    };

    match accessor.open(cx).await {
        Outcome::Ok(()) => {}
        Outcome::Err(e) => return Outcome::Err(Error::from_accessor(AccessorCall::Open, None, e)),
        Outcome::Cancelled(r) => return Outcome::Cancelled(r),
        Outcome::Panicked(p) => return Outcome::Panicked(p),
    }

    let fetched = fetch_tables(cx, accessor, &filter, config.sort_tables).await;
    accessor.close(cx).await;

    let raw = match fetched {
        Outcome::Ok(raw) => raw,
        Outcome::Err(e) => return Outcome::Err(e),
        Outcome::Cancelled(r) => return Outcome::Cancelled(r),
        Outcome::Panicked(p) => return Outcome::Panicked(p),
    };

    let (tables, enrich_warnings) = enrich(raw.tables);
    let mut warnings = raw.inconsistencies;
    warnings.extend(enrich_warnings);

    tracing::info!(
        tables = tables.len(),
        join_tables = tables.iter().filter(|t| t.is_join_table).count(),
        relationships = tables
            .iter()
            .map(|t| t.to_many_relationships.len())
            .sum::<usize>(),
        warnings = warnings.len(),
        "Schema build complete"
    );

    if config.is_strict() {
        return match InconsistencyReport::new(warnings).into_result() {
            Ok(()) => Outcome::Ok(SchemaBuild {
                tables,
                warnings: Vec::new(),
            }),
            Err(report) => Outcome::Err(Error::Inconsistency(report)),
        };
    }

    Outcome::Ok(SchemaBuild { tables, warnings })
}

/// Fetch raw table records for every table the filter allows.
///
/// The accessor must already be open. Tables are returned in accessor order
/// (or sorted by name when `sort` is set); a repeated table name is fetched
/// once and reported as a [`SchemaInconsistency`].
#[tracing::instrument(level = "debug", skip(cx, accessor, filter))]
pub async fn fetch_tables<A: SchemaAccessor>(
    cx: &Cx,
    accessor: &A,
    filter: &TableFilter,
    sort: bool,
) -> Outcome<RawSchema, Error> {
    let mut names = match accessor.table_names(cx).await {
        Outcome::Ok(names) => names,
        Outcome::Err(e) => {
            return Outcome::Err(Error::from_accessor(AccessorCall::TableNames, None, e));
        }
        Outcome::Cancelled(r) => return Outcome::Cancelled(r),
        Outcome::Panicked(p) => return Outcome::Panicked(p),
    };
    if sort {
        names.sort();
    }

    let mut raw = RawSchema::default();
    let mut seen = HashSet::new();

    for name in names {
        if !filter.allows(&name) {
            tracing::debug!(table = %name, "Skipping filtered table");
            continue;
        }
        if !seen.insert(name.clone()) {
            let inconsistency = SchemaInconsistency::duplicate_table(&name);
            tracing::warn!(table = %name, "{}", inconsistency);
            raw.inconsistencies.push(inconsistency);
            continue;
        }

        let table = match fetch_table(cx, accessor, &name).await {
            Outcome::Ok(table) => table,
            Outcome::Err(e) => return Outcome::Err(e),
            Outcome::Cancelled(r) => return Outcome::Cancelled(r),
            Outcome::Panicked(p) => return Outcome::Panicked(p),
        };
        raw.tables.push(table);
    }

    Outcome::Ok(raw)
}

/// Fetch and assemble one raw table, translating column types.
pub async fn fetch_table<A: SchemaAccessor>(
    cx: &Cx,
    accessor: &A,
    name: &str,
) -> Outcome<Table, Error> {
    tracing::debug!(table = %name, "Fetching table metadata");

    let columns = match accessor.columns(cx, name).await {
        Outcome::Ok(columns) => columns,
        Outcome::Err(e) => {
            return Outcome::Err(Error::from_accessor(AccessorCall::Columns, Some(name), e));
        }
        Outcome::Cancelled(r) => return Outcome::Cancelled(r),
        Outcome::Panicked(p) => return Outcome::Panicked(p),
    };

    let primary_key = match accessor.primary_key_info(cx, name).await {
        Outcome::Ok(pk) => pk,
        Outcome::Err(e) => {
            return Outcome::Err(Error::from_accessor(
                AccessorCall::PrimaryKeyInfo,
                Some(name),
                e,
            ));
        }
        Outcome::Cancelled(r) => return Outcome::Cancelled(r),
        Outcome::Panicked(p) => return Outcome::Panicked(p),
    };

    let foreign_keys = match accessor.foreign_key_info(cx, name).await {
        Outcome::Ok(fks) => fks,
        Outcome::Err(e) => {
            return Outcome::Err(Error::from_accessor(
                AccessorCall::ForeignKeyInfo,
                Some(name),
                e,
            ));
        }
        Outcome::Cancelled(r) => return Outcome::Cancelled(r),
        Outcome::Panicked(p) => return Outcome::Panicked(p),
    };

    let columns = columns
        .into_iter()
        .map(|column| accessor.translate_column_type(column))
        .collect();

    Outcome::Ok(Table {
        name: name.to_string(),
        columns,
        primary_key,
        foreign_keys,
        ..Table::default()
    })
}
