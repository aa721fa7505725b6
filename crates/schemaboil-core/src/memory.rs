//! In-memory schema accessor.
//!
//! Serves table metadata from plain records instead of a live database.
//! Useful for generator tests and for feeding hand-written fixtures through
//! the same build pipeline as a real driver. Failures can be injected per
//! accessor call to exercise error paths.

use crate::accessor::SchemaAccessor;
use crate::driver::Dialect;
use crate::error::{AccessorCall, AccessorError, Error};
use crate::model::{Column, ForeignKey, PrimaryKey};
use crate::types::translate_column;
use asupersync::{CancelReason, Cx, Outcome};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Raw metadata for one table served by [`MemoryAccessor`].
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    pub name: String,
    pub columns: Vec<Column>,
    pub primary_key: Option<PrimaryKey>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl MemoryTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn primary_key(mut self, primary_key: PrimaryKey) -> Self {
        self.primary_key = Some(primary_key);
        self
    }

    pub fn foreign_key(mut self, foreign_key: ForeignKey) -> Self {
        self.foreign_keys.push(foreign_key);
        self
    }
}

/// A [`SchemaAccessor`] backed by in-memory records.
#[derive(Debug, Default)]
pub struct MemoryAccessor {
    tables: Vec<MemoryTable>,
    /// Dialect used for type translation; `None` leaves types untouched
    dialect: Option<Dialect>,
    /// Injected failures: the call, and the table it applies to (`None` = any table)
    failures: Vec<(AccessorCall, Option<String>)>,
    /// Injected cancellations, matched the same way as failures
    cancellations: Vec<(AccessorCall, Option<String>)>,
    calls: Mutex<Vec<(AccessorCall, Option<String>)>>,
    opened: AtomicUsize,
    closed: AtomicUsize,
}

impl MemoryAccessor {
    pub fn new(tables: Vec<MemoryTable>) -> Self {
        Self {
            tables,
            ..Self::default()
        }
    }

    /// Translate column types with the built-in translator for `dialect`.
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    /// Make `call` fail, either for one table or for every table.
    pub fn fail_on(mut self, call: AccessorCall, table: Option<&str>) -> Self {
        self.failures.push((call, table.map(str::to_string)));
        self
    }

    /// Make `call` report cancellation, either for one table or for every table.
    pub fn cancel_on(mut self, call: AccessorCall, table: Option<&str>) -> Self {
        self.cancellations.push((call, table.map(str::to_string)));
        self
    }

    /// Number of times `open` was called.
    pub fn open_count(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Number of times `close` was called.
    pub fn close_count(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    /// Every call made so far, in order, with the table it targeted.
    pub fn calls(&self) -> Vec<(AccessorCall, Option<String>)> {
        match self.calls.lock() {
            Ok(calls) => calls.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn record(&self, cx: &Cx, call: AccessorCall, table: Option<&str>) -> Outcome<(), Error> {
        match self.calls.lock() {
            Ok(mut calls) => calls.push((call, table.map(str::to_string))),
            // Mutex was poisoned - recover by taking the lock anyway
            Err(poisoned) => poisoned
                .into_inner()
                .push((call, table.map(str::to_string))),
        }

        if let Some(reason) = cx.cancel_reason() {
            return Outcome::Cancelled(reason);
        }

        let applies = |(c, t): &(AccessorCall, Option<String>)| {
            *c == call && (t.is_none() || t.as_deref() == table)
        };
        if self.cancellations.iter().any(applies) {
            tracing::debug!(call = call.as_str(), table = ?table, "Injected accessor cancellation");
            return Outcome::Cancelled(CancelReason::user("injected cancellation"));
        }
        if self.failures.iter().any(applies) {
            tracing::debug!(call = call.as_str(), table = ?table, "Injected accessor failure");
            return Outcome::Err(AccessorError::new(call, table, "injected failure").into());
        }
        Outcome::Ok(())
    }

    fn table(&self, cx: &Cx, call: AccessorCall, name: &str) -> Outcome<&MemoryTable, Error> {
        self.record(cx, call, Some(name)).and_then(|()| {
            match self.tables.iter().find(|t| t.name == name) {
                Some(table) => Outcome::Ok(table),
                None => Outcome::Err(AccessorError::new(call, Some(name), "no such table").into()),
            }
        })
    }
}

fn ready<T>(outcome: Outcome<T, Error>) -> impl Future<Output = Outcome<T, Error>> + Send
where
    T: Send,
{
    async move { outcome }
}

impl SchemaAccessor for MemoryAccessor {
    fn open(&self, cx: &Cx) -> impl Future<Output = Outcome<(), Error>> + Send {
        self.opened.fetch_add(1, Ordering::SeqCst);
        ready(self.record(cx, AccessorCall::Open, None))
    }

    fn close(&self, _cx: &Cx) -> impl Future<Output = ()> + Send {
        self.closed.fetch_add(1, Ordering::SeqCst);
        async {}
    }

    fn table_names(&self, cx: &Cx) -> impl Future<Output = Outcome<Vec<String>, Error>> + Send {
        let outcome = self
            .record(cx, AccessorCall::TableNames, None)
            .map(|()| self.tables.iter().map(|t| t.name.clone()).collect());
        ready(outcome)
    }

    fn columns(
        &self,
        cx: &Cx,
        table_name: &str,
    ) -> impl Future<Output = Outcome<Vec<Column>, Error>> + Send {
        let outcome = self
            .table(cx, AccessorCall::Columns, table_name)
            .map(|t| t.columns.clone());
        ready(outcome)
    }

    fn primary_key_info(
        &self,
        cx: &Cx,
        table_name: &str,
    ) -> impl Future<Output = Outcome<Option<PrimaryKey>, Error>> + Send {
        let outcome = self
            .table(cx, AccessorCall::PrimaryKeyInfo, table_name)
            .map(|t| t.primary_key.clone());
        ready(outcome)
    }

    fn foreign_key_info(
        &self,
        cx: &Cx,
        table_name: &str,
    ) -> impl Future<Output = Outcome<Vec<ForeignKey>, Error>> + Send {
        let outcome = self
            .table(cx, AccessorCall::ForeignKeyInfo, table_name)
            .map(|t| t.foreign_keys.clone());
        ready(outcome)
    }

    fn translate_column_type(&self, column: Column) -> Column {
        match self.dialect {
            Some(dialect) => translate_column(dialect, column),
            None => column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asupersync::runtime::RuntimeBuilder;

    fn accessor() -> MemoryAccessor {
        MemoryAccessor::new(vec![
            MemoryTable::new("users")
                .column(Column::new("id", "integer"))
                .primary_key(PrimaryKey::new("users_pkey", &["id"])),
            MemoryTable::new("posts")
                .column(Column::new("id", "integer"))
                .column(Column::new("user_id", "integer").nullable(true))
                .foreign_key(ForeignKey::new("posts_user_fkey", "user_id", "users", "id")),
        ])
    }

    #[test]
    fn test_memory_accessor_serves_tables() {
        let rt = RuntimeBuilder::current_thread()
            .build()
            .expect("create asupersync runtime");
        let cx = Cx::for_testing();
        let accessor = accessor();

        rt.block_on(async {
            let names = accessor.table_names(&cx).await;
            assert!(matches!(&names, Outcome::Ok(n) if n == &["users", "posts"]));

            let fks = accessor.foreign_key_info(&cx, "posts").await;
            assert!(matches!(&fks, Outcome::Ok(f) if f.len() == 1));

            let pk = accessor.primary_key_info(&cx, "posts").await;
            assert!(matches!(pk, Outcome::Ok(None)));

            let missing = accessor.columns(&cx, "comments").await;
            assert!(matches!(missing, Outcome::Err(Error::Accessor(_))));
        });

        assert_eq!(accessor.calls().len(), 4);
        assert_eq!(
            accessor.calls()[1],
            (AccessorCall::ForeignKeyInfo, Some("posts".to_string()))
        );
    }

    #[test]
    fn test_memory_accessor_injected_failures() {
        let rt = RuntimeBuilder::current_thread()
            .build()
            .expect("create asupersync runtime");
        let cx = Cx::for_testing();
        let accessor = accessor().fail_on(AccessorCall::Columns, Some("posts"));

        rt.block_on(async {
            assert!(matches!(
                accessor.columns(&cx, "users").await,
                Outcome::Ok(_)
            ));
            match accessor.columns(&cx, "posts").await {
                Outcome::Err(Error::Accessor(e)) => {
                    assert_eq!(e.call, AccessorCall::Columns);
                    assert_eq!(e.table.as_deref(), Some("posts"));
                }
                _ => panic!("expected accessor error"),
            }
        });
    }

    #[test]
    fn test_memory_accessor_injected_cancellation() {
        let rt = RuntimeBuilder::current_thread()
            .build()
            .expect("create asupersync runtime");
        let cx = Cx::for_testing();
        let accessor = accessor()
            .cancel_on(AccessorCall::PrimaryKeyInfo, None)
            .fail_on(AccessorCall::PrimaryKeyInfo, None);

        rt.block_on(async {
            assert!(matches!(
                accessor.primary_key_info(&cx, "users").await,
                Outcome::Cancelled(_)
            ));
            assert!(matches!(
                accessor.columns(&cx, "users").await,
                Outcome::Ok(_)
            ));
        });
        assert_eq!(accessor.calls().len(), 2);
    }

    #[test]
    fn test_memory_accessor_open_close_counts() {
        let rt = RuntimeBuilder::current_thread()
            .build()
            .expect("create asupersync runtime");
        let cx = Cx::for_testing();
        let accessor = accessor().fail_on(AccessorCall::Open, None);

        rt.block_on(async {
            assert!(matches!(accessor.open(&cx).await, Outcome::Err(_)));
            accessor.close(&cx).await;
        });

        assert_eq!(accessor.open_count(), 1);
        assert_eq!(accessor.close_count(), 1);
    }

    #[test]
    fn test_memory_accessor_translation() {
        let plain = accessor();
        let col = plain.translate_column_type(Column::new("name", "text").nullable(true));
        assert_eq!(col.r#type, "text");

        let translating = accessor().with_dialect(Dialect::Postgres);
        let col = translating.translate_column_type(Column::new("name", "text").nullable(true));
        assert_eq!(col.r#type, "Option<String>");
        assert_eq!(col.db_type, "text");
    }
}
