//! The executor contract: the minimal capability set needed to run a query
//! or statement against SQLite.
//!
//! A raw connection and an active transaction both satisfy [`Executor`];
//! the mapping engine borrows one per call and never owns it. The free
//! functions here are the only places the engine touches the driver, so
//! they are also where cancellation is checked and statements are logged.

use rusqlite::{params_from_iter, Connection, Row, Rows, Transaction};
use tracing::debug;

use rowbind_sql::{Condition, Value};

use crate::context::ExecContext;
use crate::errors::{DaoError, DaoResult};

/// Anything that can lend a SQLite connection for one call: a raw
/// connection, a pooled connection guard, or an active transaction.
pub trait Executor {
    fn raw(&self) -> &Connection;
}

impl Executor for Connection {
    fn raw(&self) -> &Connection {
        self
    }
}

impl Executor for Transaction<'_> {
    fn raw(&self) -> &Connection {
        self
    }
}

impl<E: Executor + ?Sized> Executor for &E {
    fn raw(&self) -> &Connection {
        (**self).raw()
    }
}

/// Run a query expected to produce at most one row and map it.
///
/// Zero rows is the distinguished [`DaoError::NoRows`]; the mapping closure
/// never runs in that case.
pub fn query_row<R, F>(
    ctx: &ExecContext,
    db: &impl Executor,
    sql: &str,
    args: &[Value],
    map: F,
) -> DaoResult<R>
where
    F: FnOnce(&Row<'_>) -> DaoResult<R>,
{
    ctx.ensure_active()?;
    debug!(sql, "query row");
    let mut stmt = db.raw().prepare_cached(sql).map_err(DaoError::from_driver)?;
    let mut rows = stmt
        .query(params_from_iter(args.iter()))
        .map_err(DaoError::from_driver)?;
    match rows.next() {
        Ok(Some(row)) => map(row),
        Ok(None) => Err(DaoError::NoRows),
        Err(err) => Err(DaoError::from_driver(err)),
    }
}

/// Run a multi-row query and hand the cursor to `consume`.
///
/// The cursor's terminal error state surfaces through `consume` (see
/// [`DaoError::Cursor`]); this function only fails early on cancellation or
/// if the statement cannot start.
pub fn query<R, F>(
    ctx: &ExecContext,
    db: &impl Executor,
    sql: &str,
    args: &[Value],
    consume: F,
) -> DaoResult<R>
where
    F: FnOnce(&mut Rows<'_>) -> DaoResult<R>,
{
    ctx.ensure_active()?;
    debug!(sql, "query");
    let mut stmt = db.raw().prepare_cached(sql).map_err(DaoError::from_driver)?;
    let mut rows = stmt
        .query(params_from_iter(args.iter()))
        .map_err(DaoError::from_driver)?;
    consume(&mut rows)
}

/// Execute a statement and return the affected-row count.
pub fn execute(
    ctx: &ExecContext,
    db: &impl Executor,
    sql: &str,
    args: &[Value],
) -> DaoResult<usize> {
    ctx.ensure_active()?;
    debug!(sql, "execute");
    let mut stmt = db.raw().prepare_cached(sql).map_err(DaoError::from_driver)?;
    stmt.execute(params_from_iter(args.iter()))
        .map_err(DaoError::exec)
}

/// Execute a built condition (insert/update/delete) and return the
/// affected-row count.
pub fn execute_cond(
    ctx: &ExecContext,
    db: &impl Executor,
    cond: &dyn Condition,
) -> DaoResult<usize> {
    let (sql, args) = cond.build();
    execute(ctx, db, &sql, &args)
}
