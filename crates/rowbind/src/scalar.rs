//! Single-value and single-column extraction, independent of any record
//! type.
//!
//! One generic implementation per shape (`get_value`, `pull_values`); the
//! public entry points pin the primitive kind so call sites stay statically
//! typed without repeating the scan/error plumbing.

use rusqlite::types::FromSql;

use rowbind_sql::Condition;

use crate::context::ExecContext;
use crate::errors::{DaoError, DaoResult};
use crate::executor::{self, Executor};

fn get_value<V: FromSql>(
    ctx: &ExecContext,
    db: &impl Executor,
    cond: &dyn Condition,
) -> DaoResult<V> {
    let (sql, args) = cond.build();
    executor::query_row(ctx, db, &sql, &args, |row| {
        row.get::<_, V>(0).map_err(|err| DaoError::scan("0", err))
    })
}

fn pull_values<V: FromSql>(
    ctx: &ExecContext,
    db: &impl Executor,
    cond: &dyn Condition,
) -> DaoResult<Vec<V>> {
    let (sql, args) = cond.build();
    executor::query(ctx, db, &sql, &args, |rows| {
        let mut values = Vec::new();
        loop {
            match rows.next() {
                Ok(Some(row)) => {
                    values.push(row.get::<_, V>(0).map_err(|err| DaoError::scan("0", err))?);
                }
                Ok(None) => return Ok(values),
                Err(err) => return Err(DaoError::cursor(err)),
            }
        }
    })
}

/// Query a single boolean.
pub fn get_bool(ctx: &ExecContext, db: &impl Executor, cond: &dyn Condition) -> DaoResult<bool> {
    get_value(ctx, db, cond)
}

/// Query a single integer.
pub fn get_int(ctx: &ExecContext, db: &impl Executor, cond: &dyn Condition) -> DaoResult<i32> {
    get_value(ctx, db, cond)
}

/// Query a single 64-bit integer.
pub fn get_int64(ctx: &ExecContext, db: &impl Executor, cond: &dyn Condition) -> DaoResult<i64> {
    get_value(ctx, db, cond)
}

/// Query a single float.
pub fn get_float64(ctx: &ExecContext, db: &impl Executor, cond: &dyn Condition) -> DaoResult<f64> {
    get_value(ctx, db, cond)
}

/// Query a single string.
pub fn get_string(
    ctx: &ExecContext,
    db: &impl Executor,
    cond: &dyn Condition,
) -> DaoResult<String> {
    get_value(ctx, db, cond)
}

/// Query one boolean column across many rows, in result order.
pub fn pull_bools(
    ctx: &ExecContext,
    db: &impl Executor,
    cond: &dyn Condition,
) -> DaoResult<Vec<bool>> {
    pull_values(ctx, db, cond)
}

/// Query one integer column across many rows, in result order.
pub fn pull_ints(
    ctx: &ExecContext,
    db: &impl Executor,
    cond: &dyn Condition,
) -> DaoResult<Vec<i32>> {
    pull_values(ctx, db, cond)
}

/// Query one 64-bit integer column across many rows, in result order.
pub fn pull_int64s(
    ctx: &ExecContext,
    db: &impl Executor,
    cond: &dyn Condition,
) -> DaoResult<Vec<i64>> {
    pull_values(ctx, db, cond)
}

/// Query one float column across many rows, in result order.
pub fn pull_float64s(
    ctx: &ExecContext,
    db: &impl Executor,
    cond: &dyn Condition,
) -> DaoResult<Vec<f64>> {
    pull_values(ctx, db, cond)
}

/// Query one string column across many rows, in result order.
pub fn pull_strings(
    ctx: &ExecContext,
    db: &impl Executor,
    cond: &dyn Condition,
) -> DaoResult<Vec<String>> {
    pull_values(ctx, db, cond)
}

/// Count the rows a select condition matches, reusing its predicates.
///
/// The projection is overridden to `COUNT(*)` and pagination clauses are
/// cleared; a non-select condition fails with `NotASelectCondition`.
pub fn get_count(ctx: &ExecContext, db: &impl Executor, cond: &dyn Condition) -> DaoResult<i64> {
    let select = cond.as_select().ok_or(DaoError::NotASelectCondition)?;
    get_int64(ctx, db, &select.count_variant())
}
