//! Native SQL type parsing and translation to Rust type names.
//!
//! Accessors are free to translate column types however they like; the
//! translators here cover the common PostgreSQL, MySQL and SQLite types and
//! fall back to `String` for anything unrecognized so translation is total.

use crate::driver::Dialect;
use crate::model::Column;

/// Parsed SQL type with extracted metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSqlType {
    /// Base type name (e.g., VARCHAR, INTEGER, DECIMAL)
    pub base_type: String,
    /// Length for character types (e.g., VARCHAR(255) -> 255)
    pub length: Option<u32>,
    /// Precision for numeric types (e.g., DECIMAL(10,2) -> 10)
    pub precision: Option<u32>,
    /// Scale for numeric types (e.g., DECIMAL(10,2) -> 2)
    pub scale: Option<u32>,
    /// Whether the type is unsigned (MySQL)
    pub unsigned: bool,
    /// Whether this is an array type (PostgreSQL)
    pub array: bool,
}

impl ParsedSqlType {
    /// Parse a SQL type string into structured metadata.
    ///
    /// # Examples
    /// - `VARCHAR(255)` -> base_type: "VARCHAR", length: 255
    /// - `DECIMAL(10,2)` -> base_type: "DECIMAL", precision: 10, scale: 2
    /// - `INT UNSIGNED` -> base_type: "INT", unsigned: true
    /// - `TEXT[]` -> base_type: "TEXT", array: true
    /// - `ARRAY` -> base_type: "", array: true
    /// - `timestamp(6) with time zone` -> base_type: "TIMESTAMP WITH TIME ZONE", length: 6
    pub fn parse(type_str: &str) -> Self {
        let type_str = type_str.trim().to_uppercase();

        // information_schema reports every PostgreSQL array as a bare `ARRAY`,
        // with no element type
        if type_str == "ARRAY" {
            return Self {
                array: true,
                ..Self::default()
            };
        }

        // PostgreSQL arrays with a known element type: `TEXT[]`
        let (type_str, array) = match type_str.strip_suffix("[]") {
            Some(inner) => (inner.trim().to_string(), true),
            None => (type_str, false),
        };

        let (type_str, unsigned) = match type_str.strip_suffix(" UNSIGNED") {
            Some(inner) => (inner.trim().to_string(), true),
            None => (type_str, false),
        };

        let mut parsed = Self {
            unsigned,
            array,
            ..Self::default()
        };

        let (Some(open), Some(close)) = (type_str.find('('), type_str.rfind(')')) else {
            parsed.base_type = type_str;
            return parsed;
        };
        if close < open {
            parsed.base_type = type_str;
            return parsed;
        }

        let head = type_str[..open].trim();
        let tail = type_str[close + 1..].trim();
        parsed.base_type = if tail.is_empty() {
            head.to_string()
        } else {
            format!("{} {}", head, tail)
        };

        let params = &type_str[open + 1..close];
        if let Some((precision, scale)) = params.split_once(',') {
            parsed.precision = precision.trim().parse().ok();
            parsed.scale = scale.trim().parse().ok();
        } else {
            parsed.length = params.trim().parse().ok();
        }

        parsed
    }
}

/// Translate a parsed native type to a Rust type name for the given dialect.
///
/// Nullable columns are wrapped in `Option<..>`, arrays in `Vec<..>`.
pub fn translate(dialect: Dialect, parsed: &ParsedSqlType, nullable: bool) -> String {
    let scalar = match dialect {
        Dialect::Postgres => postgres_scalar(parsed),
        Dialect::Mysql => mysql_scalar(parsed),
        Dialect::Sqlite => sqlite_scalar(parsed),
    };

    let ty = if parsed.array {
        format!("Vec<{}>", scalar)
    } else {
        scalar.to_string()
    };

    if nullable {
        format!("Option<{}>", ty)
    } else {
        ty
    }
}

/// Translate a column's native type in place, keeping `db_type` untouched.
pub fn translate_column(dialect: Dialect, mut column: Column) -> Column {
    let parsed = ParsedSqlType::parse(&column.db_type);
    column.r#type = translate(dialect, &parsed, column.nullable);
    column
}

fn postgres_scalar(parsed: &ParsedSqlType) -> &'static str {
    match parsed.base_type.as_str() {
        "BOOLEAN" | "BOOL" => "bool",
        "SMALLINT" | "INT2" | "SMALLSERIAL" => "i16",
        "INTEGER" | "INT" | "INT4" | "SERIAL" => "i32",
        "BIGINT" | "INT8" | "BIGSERIAL" => "i64",
        "REAL" | "FLOAT4" => "f32",
        "DOUBLE PRECISION" | "FLOAT8" => "f64",
        "BYTEA" => "Vec<u8>",
        "JSON" | "JSONB" => "serde_json::Value",
        // Numeric, uuid, date/time, text and anything unknown keep their textual form
        _ => "String",
    }
}

fn mysql_scalar(parsed: &ParsedSqlType) -> &'static str {
    match (parsed.base_type.as_str(), parsed.unsigned) {
        ("TINYINT", _) if parsed.length == Some(1) => "bool",
        ("BOOLEAN" | "BOOL", _) => "bool",
        ("BIT", _) if parsed.length.is_none_or(|l| l == 1) => "bool",
        ("TINYINT", false) => "i8",
        ("TINYINT", true) => "u8",
        ("SMALLINT", false) => "i16",
        ("SMALLINT", true) => "u16",
        ("MEDIUMINT" | "INT" | "INTEGER", false) => "i32",
        ("MEDIUMINT" | "INT" | "INTEGER", true) => "u32",
        ("BIGINT", false) => "i64",
        ("BIGINT", true) => "u64",
        ("FLOAT", _) => "f32",
        ("DOUBLE" | "DOUBLE PRECISION" | "REAL", _) => "f64",
        (
            "BINARY" | "VARBINARY" | "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BIT",
            _,
        ) => "Vec<u8>",
        ("JSON", _) => "serde_json::Value",
        _ => "String",
    }
}

/// SQLite columns follow type affinity rules rather than exact names.
fn sqlite_scalar(parsed: &ParsedSqlType) -> &'static str {
    let name = parsed.base_type.as_str();
    if matches!(name, "BOOLEAN" | "BOOL") {
        "bool"
    } else if name.contains("INT") {
        "i64"
    } else if name.contains("CHAR") || name.contains("CLOB") || name.contains("TEXT") {
        "String"
    } else if name.is_empty() || name.contains("BLOB") {
        "Vec<u8>"
    } else if name.contains("REAL") || name.contains("FLOA") || name.contains("DOUB") {
        "f64"
    } else {
        "String"
    }
}
