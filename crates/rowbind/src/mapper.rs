//! `StructMapper` — the per-type façade over a descriptor: row and row-set
//! scanning plus query/exec conveniences.
//!
//! Scanning is positional: the query's projection must list columns in the
//! order the tag namespace resolves to, which is what [`StructMapper::select`]
//! generates. Obtain mappers through the registry only; they are cheap
//! handles over the shared descriptor.

use std::sync::Arc;

use rusqlite::{Row, Rows};

use rowbind_sql::{Condition, InsertCondition, InsertWay, SelectCondition, Value};

use crate::context::ExecContext;
use crate::descriptor::TypeDescriptor;
use crate::errors::{DaoError, DaoResult};
use crate::executor::{self, Executor};
use crate::record::Record;

/// Per-type mapping façade. Clones share the canonical descriptor.
pub struct StructMapper<T: Record> {
    descriptor: Arc<TypeDescriptor<T>>,
}

impl<T: Record> Clone for StructMapper<T> {
    fn clone(&self) -> Self {
        Self {
            descriptor: Arc::clone(&self.descriptor),
        }
    }
}

impl<T: Record> std::fmt::Debug for StructMapper<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructMapper")
            .field("record", &self.descriptor.record_name())
            .finish()
    }
}

impl<T: Record> StructMapper<T> {
    pub(crate) fn new(descriptor: Arc<TypeDescriptor<T>>) -> Self {
        Self { descriptor }
    }

    pub fn descriptor(&self) -> &TypeDescriptor<T> {
        &self.descriptor
    }

    /// The shared descriptor handle (canonical per record type).
    pub fn descriptor_arc(&self) -> &Arc<TypeDescriptor<T>> {
        &self.descriptor
    }

    // ── scanning ──

    /// Scan one result row into `dest` using the full column list.
    pub fn scan_row(&self, row: &Row<'_>, dest: &mut T) -> DaoResult<()> {
        self.scan_row_for_tag(row, "", dest)
    }

    /// Scan one result row into `dest` using the bindings selected by
    /// `tag`. Fails with `TypeMismatch` before reading any value if the
    /// row's column count differs from the resolved binding list.
    pub fn scan_row_for_tag(&self, row: &Row<'_>, tag: &str, dest: &mut T) -> DaoResult<()> {
        let bindings = self.descriptor.resolve(tag)?;
        self.check_arity(row, bindings.len())?;
        self.read_into(row, bindings, dest)
    }

    /// Scan every row of a cursor into `dest`, in cursor order.
    pub fn scan_rows(&self, rows: &mut Rows<'_>, dest: &mut Vec<T>) -> DaoResult<()> {
        self.scan_rows_for_tag(rows, "", dest)
    }

    /// Scan every row of a cursor into `dest`, in cursor order, using the
    /// bindings selected by `tag`.
    ///
    /// On any per-row failure the scan aborts with that failure and the
    /// contents of `dest` are unspecified; discard the buffer. A cursor
    /// error during iteration surfaces as `Cursor` even when every
    /// completed row scanned cleanly.
    pub fn scan_rows_for_tag(
        &self,
        rows: &mut Rows<'_>,
        tag: &str,
        dest: &mut Vec<T>,
    ) -> DaoResult<()> {
        let bindings = self.descriptor.resolve(tag)?;
        let mut arity_checked = false;
        loop {
            match rows.next() {
                Ok(Some(row)) => {
                    if !arity_checked {
                        self.check_arity(row, bindings.len())?;
                        arity_checked = true;
                    }
                    let mut record = T::default();
                    self.read_into(row, bindings, &mut record)?;
                    dest.push(record);
                }
                Ok(None) => return Ok(()),
                Err(err) => return Err(DaoError::cursor(err)),
            }
        }
    }

    fn check_arity(&self, row: &Row<'_>, expected: usize) -> DaoResult<()> {
        let actual = row.as_ref().column_count();
        if actual != expected {
            return Err(DaoError::TypeMismatch {
                type_name: self.descriptor.record_name(),
                expected,
                actual,
            });
        }
        Ok(())
    }

    fn read_into(&self, row: &Row<'_>, bindings: &[usize], dest: &mut T) -> DaoResult<()> {
        let columns = self.descriptor.columns();
        for (idx, &binding) in bindings.iter().enumerate() {
            let column = &columns[binding];
            (column.read)(dest, row, idx).map_err(|err| DaoError::scan(column.name, err))?;
        }
        Ok(())
    }

    // ── queries ──

    /// Run a single-row query and scan it into `dest`.
    pub fn query_row(
        &self,
        ctx: &ExecContext,
        db: &impl Executor,
        dest: &mut T,
        sql: &str,
        args: &[Value],
    ) -> DaoResult<()> {
        self.query_row_for_tag(ctx, db, dest, "", sql, args)
    }

    pub fn query_row_for_tag(
        &self,
        ctx: &ExecContext,
        db: &impl Executor,
        dest: &mut T,
        tag: &str,
        sql: &str,
        args: &[Value],
    ) -> DaoResult<()> {
        // Resolve before I/O so a bad namespace never reaches the driver.
        self.descriptor.resolve(tag)?;
        executor::query_row(ctx, db, sql, args, |row| {
            self.scan_row_for_tag(row, tag, dest)
        })
    }

    /// Run a single-row query from a built select condition.
    pub fn query_row_cond(
        &self,
        ctx: &ExecContext,
        db: &impl Executor,
        dest: &mut T,
        cond: &SelectCondition,
    ) -> DaoResult<()> {
        let (sql, args) = cond.build();
        self.query_row(ctx, db, dest, &sql, &args)
    }

    pub fn query_row_cond_for_tag(
        &self,
        ctx: &ExecContext,
        db: &impl Executor,
        dest: &mut T,
        tag: &str,
        cond: &SelectCondition,
    ) -> DaoResult<()> {
        let (sql, args) = cond.build();
        self.query_row_for_tag(ctx, db, dest, tag, &sql, &args)
    }

    /// Run a multi-row query and append every row to `dest` in result
    /// order.
    pub fn query(
        &self,
        ctx: &ExecContext,
        db: &impl Executor,
        dest: &mut Vec<T>,
        sql: &str,
        args: &[Value],
    ) -> DaoResult<()> {
        self.query_for_tag(ctx, db, dest, "", sql, args)
    }

    pub fn query_for_tag(
        &self,
        ctx: &ExecContext,
        db: &impl Executor,
        dest: &mut Vec<T>,
        tag: &str,
        sql: &str,
        args: &[Value],
    ) -> DaoResult<()> {
        self.descriptor.resolve(tag)?;
        executor::query(ctx, db, sql, args, |rows| {
            self.scan_rows_for_tag(rows, tag, dest)
        })
    }

    pub fn query_cond(
        &self,
        ctx: &ExecContext,
        db: &impl Executor,
        dest: &mut Vec<T>,
        cond: &SelectCondition,
    ) -> DaoResult<()> {
        let (sql, args) = cond.build();
        self.query(ctx, db, dest, &sql, &args)
    }

    pub fn query_cond_for_tag(
        &self,
        ctx: &ExecContext,
        db: &impl Executor,
        dest: &mut Vec<T>,
        tag: &str,
        cond: &SelectCondition,
    ) -> DaoResult<()> {
        let (sql, args) = cond.build();
        self.query_for_tag(ctx, db, dest, tag, &sql, &args)
    }

    // ── statement generation ──

    /// A select over `table` projecting the full column list, in scan
    /// order.
    pub fn select(&self, table: &str) -> DaoResult<SelectCondition> {
        self.select_for_tag(table, "")
    }

    /// A select over `table` projecting the columns selected by `tag`.
    pub fn select_for_tag(&self, table: &str, tag: &str) -> DaoResult<SelectCondition> {
        let columns = self.descriptor.column_list(tag)?;
        Ok(SelectCondition::from(table).columns(columns))
    }

    /// Build a multi-row insert for `records` from their bind accessors.
    pub fn insert_cond(
        &self,
        way: InsertWay,
        table: &str,
        records: &[T],
    ) -> DaoResult<InsertCondition> {
        let bindings = self.descriptor.resolve("")?;
        let columns = self.descriptor.columns();
        let mut cond = InsertCondition::into_table(table)
            .way(way)
            .columns(bindings.iter().map(|&idx| columns[idx].name));
        for record in records {
            cond = cond.values(bindings.iter().map(|&idx| (columns[idx].bind)(record)));
        }
        Ok(cond)
    }

    /// Insert `records` into `table` and return the affected-row count.
    pub fn insert(
        &self,
        ctx: &ExecContext,
        db: &impl Executor,
        way: InsertWay,
        table: &str,
        records: &[T],
    ) -> DaoResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        let cond = self.insert_cond(way, table, records)?;
        executor::execute_cond(ctx, db, &cond)
    }

    // ── statements ──

    /// Execute a raw statement.
    pub fn execute(
        &self,
        ctx: &ExecContext,
        db: &impl Executor,
        sql: &str,
        args: &[Value],
    ) -> DaoResult<usize> {
        executor::execute(ctx, db, sql, args)
    }

    /// Execute a built condition.
    pub fn execute_cond(
        &self,
        ctx: &ExecContext,
        db: &impl Executor,
        cond: &dyn Condition,
    ) -> DaoResult<usize> {
        executor::execute_cond(ctx, db, cond)
    }
}
