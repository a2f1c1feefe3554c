//! # rowbind
//!
//! Struct-to-row mapping engine for SQLite. Record types declare their
//! column bindings once (usually via [`record!`]); the engine builds and
//! caches an immutable descriptor per type, scans single rows and row sets
//! positionally, extracts scalars and columns, and wraps units of work in
//! transactions with rollback on failure.
//!
//! Only type metadata is ever cached, never query results.

pub mod context;
pub mod descriptor;
pub mod errors;
pub mod executor;
pub mod mapper;
pub mod record;
pub mod scalar;
pub mod tx;

pub use context::ExecContext;
pub use descriptor::{mapper, MapperRegistry, TypeDescriptor};
pub use errors::{DaoError, DaoResult};
pub use executor::{execute, execute_cond, query, query_row, Executor};
pub use mapper::StructMapper;
pub use record::{Column, Record};
pub use scalar::{
    get_bool, get_count, get_float64, get_int, get_int64, get_string, pull_bools, pull_float64s,
    pull_int64s, pull_ints, pull_strings,
};
pub use tx::{with_transaction, TxBehavior, TxOptions};

pub use rowbind_sql::{
    Condition, DeleteCondition, InsertCondition, InsertWay, SelectCondition, UpdateCondition,
    Value,
};

// The `record!` macro expands in downstream crates; they reach the driver
// types through this re-export.
pub use rusqlite;
