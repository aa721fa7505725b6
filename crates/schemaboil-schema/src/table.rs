//! Enriched table model.
//!
//! A [`Table`] starts out holding exactly what the accessor reported and is
//! completed by the enrichment passes in [`crate::enrich`]: `is_join_table`,
//! the derived flags on each foreign key, and `to_many_relationships`.

use schemaboil_core::driver::driver_uses_last_insert_id;
use schemaboil_core::model::{Column, ForeignKey, PrimaryKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A database table and everything known about it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub primary_key: Option<PrimaryKey>,
    /// Outbound foreign keys, in declaration order
    pub foreign_keys: Vec<ForeignKey>,
    /// Inbound to-many relationships from other tables (derived)
    pub to_many_relationships: Vec<Relationship>,
    /// Whether this is a pure many-to-many join table (derived)
    pub is_join_table: bool,
}

/// An inbound to-many edge, recorded on the referenced ("one") side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Name of the foreign key this edge was derived from
    pub name: String,
    /// Column on this table that is referenced
    pub column: String,
    pub nullable: bool,
    pub unique: bool,

    /// Table holding the foreign key
    pub foreign_table: String,
    /// Foreign key column in `foreign_table`
    pub foreign_column: String,
    pub foreign_column_nullable: bool,
    pub foreign_column_unique: bool,

    /// `foreign_table` is a join table; this edge is one leg of a many-to-many
    pub to_join_table: bool,
    /// The far side of the many-to-many, when `to_join_table` is set
    pub join: Option<JoinLeg>,
}

/// The other half of a many-to-many association through a join table.
///
/// Given `users <- user_roles -> roles`, the relationship recorded on `users`
/// carries `local_column = "user_id"`, `remote_column = "role_id"`,
/// `remote_table = "roles"` and `remote_foreign_column = "id"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinLeg {
    /// Join table column referencing this table
    pub local_column: String,
    /// Join table column referencing the remote table
    pub remote_column: String,
    pub remote_table: String,
    /// Column in `remote_table` referenced by `remote_column`
    pub remote_foreign_column: String,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get a foreign key by constraint name.
    pub fn foreign_key(&self, name: &str) -> Option<&ForeignKey> {
        self.foreign_keys.iter().find(|fk| fk.name == name)
    }

    /// Primary key columns as a set (empty without a primary key).
    pub fn primary_key_columns(&self) -> BTreeSet<&str> {
        self.primary_key
            .iter()
            .flat_map(|pk| pk.columns.iter().map(String::as_str))
            .collect()
    }

    /// Columns used by this table's foreign keys, as a set.
    pub fn foreign_key_columns(&self) -> BTreeSet<&str> {
        self.foreign_keys
            .iter()
            .map(|fk| fk.column.as_str())
            .collect()
    }

    /// Whether generated keys for this table can be read back with
    /// "last insert id" on the given driver.
    ///
    /// Requires a single-column primary key whose default auto-increments.
    pub fn can_last_insert_id(&self, driver: &str) -> bool {
        if !driver_uses_last_insert_id(driver) {
            return false;
        }
        let Some(pk) = &self.primary_key else {
            return false;
        };
        match pk.columns.as_slice() {
            [only] => self.column(only).is_some_and(Column::is_auto_increment),
            _ => false,
        }
    }

    /// Relationships that are legs of a many-to-many association.
    pub fn many_to_many(&self) -> impl Iterator<Item = &Relationship> {
        self.to_many_relationships.iter().filter(|r| r.to_join_table)
    }
}

/// Find a table by name.
pub fn get_table<'a>(tables: &'a [Table], name: &str) -> Option<&'a Table> {
    tables.iter().find(|t| t.name == name)
}
