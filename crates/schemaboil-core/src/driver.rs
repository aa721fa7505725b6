//! Static per-driver capabilities.
//!
//! These facts describe a database system, not any particular schema, and
//! are consulted by generators when emitting insert code.

use serde::{Deserialize, Serialize};

/// Supported database dialects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// PostgreSQL
    #[default]
    Postgres,
    /// MySQL/MariaDB
    Mysql,
    /// SQLite
    Sqlite,
}

impl Dialect {
    /// Resolve a driver identifier (`"postgres"`, `"mysql"`, `"sqlite3"`).
    ///
    /// Returns `None` for identifiers outside the supported set.
    #[must_use]
    pub fn from_driver_name(name: &str) -> Option<Self> {
        match name {
            "postgres" => Some(Dialect::Postgres),
            "mysql" => Some(Dialect::Mysql),
            "sqlite3" | "sqlite" => Some(Dialect::Sqlite),
            _ => None,
        }
    }

    /// Canonical driver identifier.
    #[must_use]
    pub const fn driver_name(&self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::Mysql => "mysql",
            Dialect::Sqlite => "sqlite3",
        }
    }

    /// Whether generated keys are read back with a "last insert id" call
    /// rather than a `RETURNING` clause.
    #[must_use]
    pub const fn uses_last_insert_id(&self) -> bool {
        match self {
            Dialect::Postgres => false,
            Dialect::Mysql | Dialect::Sqlite => true,
        }
    }
}

/// Whether the named driver returns generated keys via "last insert id".
///
/// Unknown drivers return `false`, i.e. explicit `RETURNING` support is assumed.
#[must_use]
pub fn driver_uses_last_insert_id(driver: &str) -> bool {
    Dialect::from_driver_name(driver).is_some_and(|d| d.uses_last_insert_id())
}
