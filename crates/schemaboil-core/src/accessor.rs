//! The schema accessor contract.
//!
//! A [`SchemaAccessor`] is the driver-specific side of schema building: it
//! performs the actual introspection queries and hands back raw, per-table
//! records. Everything after that (join table detection, constraint
//! propagation, relationship derivation) is driver agnostic.
//!
//! All I/O operations integrate with asupersync's structured concurrency via
//! `Cx` context for proper cancellation and timeout handling. Timeouts and
//! retries are the accessor's own business.

use crate::error::Error;
use crate::model::{Column, ForeignKey, PrimaryKey};
use asupersync::{Cx, Outcome};

/// Driver-specific source of raw table metadata.
///
/// Implementations must be `Send + Sync` for use across async boundaries.
///
/// # Example
///
/// ```rust,ignore
/// accessor.open(&cx).await?;
/// for name in accessor.table_names(&cx).await? {
///     let columns = accessor.columns(&cx, &name).await?;
///     let columns: Vec<_> = columns
///         .into_iter()
///         .map(|c| accessor.translate_column_type(c))
///         .collect();
/// }
/// accessor.close(&cx).await;
/// ```
pub trait SchemaAccessor: Send + Sync {
    /// Acquire the underlying connection.
    ///
    /// A failure here aborts the whole build.
    fn open(&self, cx: &Cx) -> impl Future<Output = Outcome<(), Error>> + Send;

    /// Release the underlying connection.
    fn close(&self, cx: &Cx) -> impl Future<Output = ()> + Send;

    /// List the names of all tables to be described.
    fn table_names(&self, cx: &Cx) -> impl Future<Output = Outcome<Vec<String>, Error>> + Send;

    /// Get the columns of a table, with native types.
    fn columns(
        &self,
        cx: &Cx,
        table_name: &str,
    ) -> impl Future<Output = Outcome<Vec<Column>, Error>> + Send;

    /// Get the primary key of a table, if it has one.
    fn primary_key_info(
        &self,
        cx: &Cx,
        table_name: &str,
    ) -> impl Future<Output = Outcome<Option<PrimaryKey>, Error>> + Send;

    /// Get the outbound foreign keys of a table, in declaration order.
    fn foreign_key_info(
        &self,
        cx: &Cx,
        table_name: &str,
    ) -> impl Future<Output = Outcome<Vec<ForeignKey>, Error>> + Send;

    /// Map a column's native type to the generator's type vocabulary.
    ///
    /// Pure and total: must handle every type this accessor can report.
    fn translate_column_type(&self, column: Column) -> Column;
}
