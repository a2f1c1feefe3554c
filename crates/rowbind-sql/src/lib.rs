//! # rowbind-sql
//!
//! Fluent condition builders for SQLite statements. Each builder renders to
//! a SQL string plus positional arguments (`rusqlite::types::Value`), ready
//! to hand to an executor. The mapping engine consumes builders only through
//! the [`Condition`] trait.

pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

pub use delete::DeleteCondition;
pub use insert::{InsertCondition, InsertWay};
pub use select::SelectCondition;
pub use update::UpdateCondition;

pub use rusqlite::types::Value;

/// A backend-agnostic description of a query or statement, compiled to SQL
/// text plus positional arguments.
pub trait Condition {
    /// Render the condition to `(sql, args)`.
    fn build(&self) -> (String, Vec<Value>);

    /// Downcast hook for helpers that only operate on select conditions
    /// (e.g. row counting). Non-select builders return `None`.
    fn as_select(&self) -> Option<&SelectCondition> {
        None
    }
}

/// Push a rendered fragment list as `sep`-joined text onto `sql`, prefixed
/// by `keyword`, when the list is non-empty.
pub(crate) fn push_clause(sql: &mut String, keyword: &str, parts: &[String], sep: &str) {
    if parts.is_empty() {
        return;
    }
    sql.push(' ');
    sql.push_str(keyword);
    sql.push(' ');
    sql.push_str(&parts.join(sep));
}
