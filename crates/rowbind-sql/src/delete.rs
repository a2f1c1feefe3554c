//! DELETE builder.

use rusqlite::types::Value;

use crate::{push_clause, Condition};

/// Fluent builder for DELETE statements.
#[derive(Debug, Clone, Default)]
pub struct DeleteCondition {
    table: String,
    predicates: Vec<String>,
    where_args: Vec<Value>,
}

impl DeleteCondition {
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    pub fn and_where(mut self, fragment: impl Into<String>) -> Self {
        self.predicates.push(fragment.into());
        self
    }

    pub fn and_where_with<I, V>(mut self, fragment: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.predicates.push(fragment.into());
        self.where_args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl Condition for DeleteCondition {
    fn build(&self) -> (String, Vec<Value>) {
        let mut sql = format!("DELETE FROM {}", self.table);
        push_clause(&mut sql, "WHERE", &self.predicates, " AND ");
        (sql, self.where_args.clone())
    }
}
