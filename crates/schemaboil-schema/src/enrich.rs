//! Schema graph enrichment.
//!
//! Turns flat per-table metadata into a cross-referenced graph in three
//! passes over the complete table slice:
//!
//! 1. Join table classification (per table, no cross-table reads)
//! 2. Foreign key constraint propagation (reads owning and referenced tables)
//! 3. To-many relationship derivation (reads every table's foreign keys)
//!
//! Each pass runs to completion over all tables before the next starts.
//! Relationships depend on both earlier passes, and a table's relationship
//! list depends on every other table, so none of this can run incrementally
//! while tables are still being fetched.

use crate::table::{JoinLeg, Relationship, Table, get_table};
use schemaboil_core::error::SchemaInconsistency;
use schemaboil_core::model::ForeignKey;

/// Decide whether a table is a pure join table and record it on the table.
///
/// A join table has a primary key of exactly two columns, and those two
/// columns are exactly the set of columns used by its foreign keys.
pub fn classify_join_table(table: &mut Table) -> bool {
    table.is_join_table = is_join_table(table);
    table.is_join_table
}

/// Join table test without side effects.
pub fn is_join_table(table: &Table) -> bool {
    let pkey_columns = table.primary_key_columns();
    let fkey_columns = table.foreign_key_columns();

    pkey_columns.len() == 2 && pkey_columns == fkey_columns
}

/// Foreign keys of one table with their derived flags filled in.
#[derive(Debug, Clone, Default)]
pub struct PropagatedKeys {
    pub foreign_keys: Vec<ForeignKey>,
    pub inconsistencies: Vec<SchemaInconsistency>,
}

/// Compute nullability/uniqueness of both sides of each of `table`'s foreign keys.
///
/// The owning column is looked up in `table`, the referenced column in the
/// table named by the key (found in `tables`). Flags that cannot be resolved
/// stay `false` and the dangling reference is reported.
pub fn propagate_foreign_key_constraints(table: &Table, tables: &[Table]) -> PropagatedKeys {
    let mut out = PropagatedKeys::default();

    for fkey in &table.foreign_keys {
        let mut fkey = fkey.clone();
        fkey.nullable = false;
        fkey.unique = false;
        fkey.foreign_column_nullable = false;
        fkey.foreign_column_unique = false;

        match table.column(&fkey.column) {
            Some(column) => {
                fkey.nullable = column.nullable;
                fkey.unique = column.unique;
            }
            None => out.inconsistencies.push(SchemaInconsistency::missing_column(
                &table.name,
                &fkey.name,
                &fkey.column,
            )),
        }

        match get_table(tables, &fkey.foreign_table) {
            Some(foreign_table) => match foreign_table.column(&fkey.foreign_column) {
                Some(column) => {
                    fkey.foreign_column_nullable = column.nullable;
                    fkey.foreign_column_unique = column.unique;
                }
                None => out
                    .inconsistencies
                    .push(SchemaInconsistency::missing_foreign_column(
                        &table.name,
                        &fkey.name,
                        &fkey.foreign_table,
                        &fkey.foreign_column,
                    )),
            },
            None => out.inconsistencies.push(SchemaInconsistency::missing_table(
                &table.name,
                &fkey.name,
                &fkey.foreign_table,
            )),
        }

        tracing::trace!(
            table = %table.name,
            foreign_key = %fkey.name,
            nullable = fkey.nullable,
            unique = fkey.unique,
            foreign_column_nullable = fkey.foreign_column_nullable,
            foreign_column_unique = fkey.foreign_column_unique,
            "Propagated foreign key constraints"
        );

        out.foreign_keys.push(fkey);
    }

    out
}

/// Derive the inbound to-many relationships of `table`.
///
/// Every other table's foreign keys are scanned. Keys a table holds on
/// itself never become relationships. Order follows `tables`, then foreign
/// key declaration order within each table.
pub fn derive_relationships(table: &Table, tables: &[Table]) -> Vec<Relationship> {
    let mut relationships = Vec::new();

    for foreign_table in tables {
        for fkey in &foreign_table.foreign_keys {
            if fkey.foreign_table != table.name || fkey.is_self_referencing(&foreign_table.name) {
                continue;
            }

            let join = if foreign_table.is_join_table {
                join_leg(foreign_table, fkey)
            } else {
                None
            };

            relationships.push(Relationship {
                name: fkey.name.clone(),
                column: fkey.foreign_column.clone(),
                nullable: fkey.foreign_column_nullable,
                unique: fkey.foreign_column_unique,
                foreign_table: foreign_table.name.clone(),
                foreign_column: fkey.column.clone(),
                foreign_column_nullable: fkey.nullable,
                foreign_column_unique: fkey.unique,
                to_join_table: foreign_table.is_join_table,
                join,
            });
        }
    }

    relationships
}

/// The far side of a join table, as seen from the leg `fkey`.
///
/// The remote leg is the first foreign key of the join table on a different
/// column than `fkey`.
fn join_leg(join_table: &Table, fkey: &ForeignKey) -> Option<JoinLeg> {
    let remote = join_table
        .foreign_keys
        .iter()
        .find(|other| other.column != fkey.column)?;

    Some(JoinLeg {
        local_column: fkey.column.clone(),
        remote_column: remote.column.clone(),
        remote_table: remote.foreign_table.clone(),
        remote_foreign_column: remote.foreign_column.clone(),
    })
}

/// Run all enrichment passes over a fully fetched table slice.
///
/// Returns the enriched tables in input order along with every dangling
/// reference encountered. Inconsistencies never abort enrichment.
#[tracing::instrument(level = "debug", skip(tables), fields(tables = tables.len()))]
pub fn enrich(mut tables: Vec<Table>) -> (Vec<Table>, Vec<SchemaInconsistency>) {
    let mut inconsistencies = Vec::new();

    for table in &mut tables {
        if classify_join_table(table) {
            tracing::debug!(table = %table.name, "Classified as join table");
        }
    }

    let propagated: Vec<PropagatedKeys> = tables
        .iter()
        .map(|table| propagate_foreign_key_constraints(table, &tables))
        .collect();
    for (table, keys) in tables.iter_mut().zip(propagated) {
        table.foreign_keys = keys.foreign_keys;
        for inconsistency in keys.inconsistencies {
            tracing::warn!(table = %table.name, "{}", inconsistency);
            inconsistencies.push(inconsistency);
        }
    }

    let relationships: Vec<Vec<Relationship>> = tables
        .iter()
        .map(|table| derive_relationships(table, &tables))
        .collect();
    for (table, relationships) in tables.iter_mut().zip(relationships) {
        tracing::debug!(
            table = %table.name,
            count = relationships.len(),
            "Derived to-many relationships"
        );
        table.to_many_relationships = relationships;
    }

    (tables, inconsistencies)
}
