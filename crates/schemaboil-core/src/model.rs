//! Column and key records as reported by a schema accessor.
//!
//! These are passive records. The derived fields on [`ForeignKey`]
//! (`nullable`, `unique`, `foreign_column_nullable`, `foreign_column_unique`)
//! are never supplied by an accessor; they are filled in by the enrichment
//! passes in `schemaboil-schema`.

use serde::{Deserialize, Serialize};

/// A single table column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name, unique within its table
    pub name: String,
    /// Target-language type after translation (native type before)
    #[serde(rename = "type")]
    pub r#type: String,
    /// Native database type as reported by the accessor
    pub db_type: String,
    /// Default value expression
    pub default: Option<String>,
    /// Whether the column accepts NULL
    pub nullable: bool,
    /// Whether the column participates in a uniqueness constraint
    pub unique: bool,
}

impl Column {
    /// Create a column whose translated and native types start out equal.
    pub fn new(name: impl Into<String>, db_type: impl Into<String>) -> Self {
        let db_type = db_type.into();
        Self {
            name: name.into(),
            r#type: db_type.clone(),
            db_type,
            default: None,
            nullable: false,
            unique: false,
        }
    }

    /// Set nullability.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Set uniqueness.
    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Set the default expression.
    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Whether the default expression generates a value on insert
    /// (sequences, identity columns, `AUTO_INCREMENT`).
    ///
    /// Quoted literals never count, whatever their text.
    pub fn is_auto_increment(&self) -> bool {
        self.default.as_deref().is_some_and(|d| {
            let d = d.trim().to_ascii_lowercase();
            if d.starts_with('\'') {
                return false;
            }
            d.starts_with("nextval(")
                || d.contains("auto_increment")
                || d.starts_with("identity")
                || d.contains("as identity")
        })
    }
}

/// Primary key of a table. Column order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKey {
    /// Constraint name
    pub name: String,
    /// Columns in the key
    pub columns: Vec<String>,
}

impl PrimaryKey {
    pub fn new(name: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            name: name.into(),
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
        }
    }
}

/// An outbound foreign key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Constraint name
    pub name: String,
    /// Owning column
    pub column: String,
    /// Referenced table
    pub foreign_table: String,
    /// Referenced column
    pub foreign_column: String,

    /// Owning column accepts NULL (derived)
    pub nullable: bool,
    /// Owning column is unique (derived)
    pub unique: bool,
    /// Referenced column accepts NULL (derived)
    pub foreign_column_nullable: bool,
    /// Referenced column is unique (derived)
    pub foreign_column_unique: bool,
}

impl ForeignKey {
    /// Create a foreign key with its derived fields unset.
    pub fn new(
        name: impl Into<String>,
        column: impl Into<String>,
        foreign_table: impl Into<String>,
        foreign_column: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            column: column.into(),
            foreign_table: foreign_table.into(),
            foreign_column: foreign_column.into(),
            ..Self::default()
        }
    }

    /// Whether this key points back at its own table.
    pub fn is_self_referencing(&self, owning_table: &str) -> bool {
        self.foreign_table == owning_table
    }
}

/// Names of the given columns, in order.
pub fn column_names(columns: &[Column]) -> Vec<String> {
    columns.iter().map(|c| c.name.clone()).collect()
}

/// Columns that do (`has_default = true`) or do not have a default expression.
pub fn filter_columns_by_default(columns: &[Column], has_default: bool) -> Vec<Column> {
    columns
        .iter()
        .filter(|c| c.default.is_some() == has_default)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_builder() {
        let col = Column::new("email", "character varying")
            .nullable(true)
            .unique(true);
        assert_eq!(col.r#type, "character varying");
        assert_eq!(col.db_type, "character varying");
        assert!(col.nullable);
        assert!(col.unique);
        assert!(col.default.is_none());
    }

    #[test]
    fn test_column_auto_increment() {
        assert!(
            Column::new("id", "integer")
                .default_value("nextval('users_id_seq'::regclass)")
                .is_auto_increment()
        );
        assert!(
            Column::new("id", "int")
                .default_value("auto_increment")
                .is_auto_increment()
        );
        assert!(
            !Column::new("name", "text")
                .default_value("'anonymous'")
                .is_auto_increment()
        );
        assert!(!Column::new("name", "text").is_auto_increment());
    }

    #[test]
    fn test_column_identity_defaults() {
        let default = |d: &str| Column::new("id", "integer").default_value(d).is_auto_increment();
        assert!(default("GENERATED BY DEFAULT AS IDENTITY"));
        assert!(default("generated always as identity (start with 1)"));
        assert!(default("IDENTITY(1,1)"));
        assert!(!default("'identity_card'"));
        assert!(!default("'identity'::text"));
        assert!(!default("'auto_increment'"));
    }

    #[test]
    fn test_column_helpers() {
        let columns = vec![
            Column::new("id", "integer").default_value("nextval('seq')"),
            Column::new("name", "text"),
            Column::new("created_at", "timestamp").default_value("now()"),
        ];

        assert_eq!(column_names(&columns), vec!["id", "name", "created_at"]);

        let with_default = filter_columns_by_default(&columns, true);
        assert_eq!(column_names(&with_default), vec!["id", "created_at"]);

        let without_default = filter_columns_by_default(&columns, false);
        assert_eq!(column_names(&without_default), vec!["name"]);
    }

    #[test]
    fn test_foreign_key_new_leaves_derived_fields_unset() {
        let fk = ForeignKey::new("posts_author_fkey", "author_id", "users", "id");
        assert!(!fk.nullable);
        assert!(!fk.unique);
        assert!(!fk.foreign_column_nullable);
        assert!(!fk.foreign_column_unique);
        assert!(!fk.is_self_referencing("posts"));
        assert!(fk.is_self_referencing("users"));
    }

    #[test]
    fn test_column_type_serializes_as_type() {
        let json = serde_json::to_value(Column::new("id", "integer")).unwrap();
        assert_eq!(json["type"], "integer");
        assert_eq!(json["db_type"], "integer");
    }
}
