//! Error types for schema building.

use std::fmt;

/// The primary error type for schema building.
#[derive(Debug)]
pub enum Error {
    /// A schema accessor call failed (always fatal to the build)
    Accessor(AccessorError),
    /// Strict mode found inconsistent metadata
    Inconsistency(InconsistencyReport),
    /// Invalid build configuration
    Config(ConfigError),
    /// Operation was cancelled via asupersync
    Cancelled,
    /// Serialization/deserialization errors
    Serde(String),
    /// Custom error with message
    Custom(String),
}

/// Which accessor capability produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorCall {
    /// Acquiring the underlying connection
    Open,
    /// Listing table names
    TableNames,
    /// Fetching the column list of a table
    Columns,
    /// Fetching the primary key of a table
    PrimaryKeyInfo,
    /// Fetching the foreign keys of a table
    ForeignKeyInfo,
}

impl AccessorCall {
    /// Name of the call as used in messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            AccessorCall::Open => "open",
            AccessorCall::TableNames => "table_names",
            AccessorCall::Columns => "columns",
            AccessorCall::PrimaryKeyInfo => "primary_key_info",
            AccessorCall::ForeignKeyInfo => "foreign_key_info",
        }
    }
}

#[derive(Debug)]
pub struct AccessorError {
    pub call: AccessorCall,
    pub table: Option<String>,
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AccessorError {
    /// Create an accessor error without an underlying cause.
    pub fn new(call: AccessorCall, table: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            call,
            table: table.map(str::to_string),
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying cause.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

/// What kind of dangling reference was found in accessor output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InconsistencyKind {
    /// A foreign key references a table that was not fetched
    MissingTable,
    /// A foreign key's own column does not exist in its table
    MissingColumn,
    /// A foreign key's referenced column does not exist in the referenced table
    MissingForeignColumn,
    /// The accessor returned the same table name more than once
    DuplicateTable,
}

/// A single non-fatal data inconsistency in the fetched metadata.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SchemaInconsistency {
    pub kind: InconsistencyKind,
    /// Table owning the offending foreign key (or the duplicated table)
    pub table: String,
    /// Name of the offending foreign key, if any
    pub foreign_key: Option<String>,
    /// The column that could not be resolved
    pub column: Option<String>,
    pub message: String,
}

impl SchemaInconsistency {
    /// A foreign key points at a table that is not part of the schema.
    pub fn missing_table(table: &str, foreign_key: &str, foreign_table: &str) -> Self {
        Self {
            kind: InconsistencyKind::MissingTable,
            table: table.to_string(),
            foreign_key: Some(foreign_key.to_string()),
            column: None,
            message: format!(
                "foreign key '{}' on '{}' references unknown table '{}'",
                foreign_key, table, foreign_table
            ),
        }
    }

    /// A foreign key names a column its own table does not have.
    pub fn missing_column(table: &str, foreign_key: &str, column: &str) -> Self {
        Self {
            kind: InconsistencyKind::MissingColumn,
            table: table.to_string(),
            foreign_key: Some(foreign_key.to_string()),
            column: Some(column.to_string()),
            message: format!(
                "foreign key '{}' on '{}' uses unknown column '{}'",
                foreign_key, table, column
            ),
        }
    }

    /// A foreign key references a column missing from the referenced table.
    pub fn missing_foreign_column(
        table: &str,
        foreign_key: &str,
        foreign_table: &str,
        foreign_column: &str,
    ) -> Self {
        Self {
            kind: InconsistencyKind::MissingForeignColumn,
            table: table.to_string(),
            foreign_key: Some(foreign_key.to_string()),
            column: Some(foreign_column.to_string()),
            message: format!(
                "foreign key '{}' on '{}' references unknown column '{}.{}'",
                foreign_key, table, foreign_table, foreign_column
            ),
        }
    }

    /// The accessor listed a table twice.
    pub fn duplicate_table(table: &str) -> Self {
        Self {
            kind: InconsistencyKind::DuplicateTable,
            table: table.to_string(),
            foreign_key: None,
            column: None,
            message: format!("table '{}' was returned more than once", table),
        }
    }
}

/// All inconsistencies found by a strict build.
#[derive(Debug, Clone, Default)]
pub struct InconsistencyReport {
    pub inconsistencies: Vec<SchemaInconsistency>,
}

impl InconsistencyReport {
    pub fn new(inconsistencies: Vec<SchemaInconsistency>) -> Self {
        Self { inconsistencies }
    }

    pub fn is_empty(&self) -> bool {
        self.inconsistencies.is_empty()
    }

    /// Convert to Result, returning Ok(()) if nothing was recorded, Err(self) otherwise.
    pub fn into_result(self) -> std::result::Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

#[derive(Debug)]
pub struct ConfigError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Wrap an error returned by an accessor call with the call and table it came from.
    ///
    /// Errors that are already accessor errors keep their call, and only gain
    /// a table name if they had none.
    pub fn from_accessor(call: AccessorCall, table: Option<&str>, err: Error) -> Self {
        match err {
            Error::Accessor(mut e) => {
                if e.table.is_none() {
                    e.table = table.map(str::to_string);
                }
                Error::Accessor(e)
            }
            Error::Cancelled => Error::Cancelled,
            other => Error::Accessor(AccessorError {
                call,
                table: table.map(str::to_string),
                message: other.to_string(),
                source: Some(Box::new(other)),
            }),
        }
    }

    /// Is this a failure of the schema accessor?
    pub fn is_accessor_error(&self) -> bool {
        matches!(self, Error::Accessor(_))
    }

    /// The accessor call that failed, if this is an accessor error.
    pub fn accessor_call(&self) -> Option<AccessorCall> {
        match self {
            Error::Accessor(e) => Some(e.call),
            _ => None,
        }
    }

    /// The table being fetched when the error occurred, if known.
    pub fn table(&self) -> Option<&str> {
        match self {
            Error::Accessor(e) => e.table.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Accessor(e) => write!(f, "Accessor error: {}", e),
            Error::Inconsistency(e) => write!(f, "Schema inconsistency: {}", e),
            Error::Config(e) => write!(f, "Configuration error: {}", e.message),
            Error::Cancelled => write!(f, "Operation cancelled"),
            Error::Serde(msg) => write!(f, "Serialization error: {}", msg),
            Error::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Accessor(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            Error::Config(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

impl fmt::Display for AccessorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(table) = &self.table {
            write!(
                f,
                "{} failed for table '{}': {}",
                self.call.as_str(),
                table,
                self.message
            )
        } else {
            write!(f, "{} failed: {}", self.call.as_str(), self.message)
        }
    }
}

impl fmt::Display for SchemaInconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for InconsistencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inconsistencies.is_empty() {
            write!(f, "no inconsistencies")
        } else if self.inconsistencies.len() == 1 {
            write!(f, "{}", self.inconsistencies[0])
        } else {
            writeln!(f, "{} inconsistencies:", self.inconsistencies.len())?;
            for inconsistency in &self.inconsistencies {
                writeln!(f, "  - {}", inconsistency)?;
            }
            Ok(())
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AccessorError {}

impl std::error::Error for InconsistencyReport {}

impl From<AccessorError> for Error {
    fn from(err: AccessorError) -> Self {
        Error::Accessor(err)
    }
}

impl From<InconsistencyReport> for Error {
    fn from(err: InconsistencyReport) -> Self {
        Error::Inconsistency(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

/// Result type alias for schema operations.
pub type Result<T> = std::result::Result<T, Error>;
