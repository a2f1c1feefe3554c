//! UPDATE builder.

use rusqlite::types::Value;

use crate::{push_clause, Condition};

/// Fluent builder for UPDATE statements. Assignment arguments precede
/// predicate arguments in the rendered positional list.
#[derive(Debug, Clone, Default)]
pub struct UpdateCondition {
    table: String,
    assignments: Vec<String>,
    set_args: Vec<Value>,
    predicates: Vec<String>,
    where_args: Vec<Value>,
}

impl UpdateCondition {
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Assign `column = ?` with the given value.
    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.assignments.push(format!("{column} = ?"));
        self.set_args.push(value.into());
        self
    }

    /// Assign a raw expression, e.g. `"access_count = access_count + 1"`.
    pub fn set_expr(mut self, expr: impl Into<String>) -> Self {
        self.assignments.push(expr.into());
        self
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

impl Condition for UpdateCondition {
    fn build(&self) -> (String, Vec<Value>) {
        let mut sql = format!("UPDATE {} SET {}", self.table, self.assignments.join(", "));
        push_clause(&mut sql, "WHERE", &self.predicates, " AND ");
        let mut args = self.set_args.clone();
        args.extend(self.where_args.iter().cloned());
        (sql, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_with_predicate() {
        let (sql, args) = UpdateCondition::table("users")
            .set("userName", "grace".to_string())
            .set_expr("access_count = access_count + 1")
            .and_where_with("uin = ?", [7i64])
            .build();
        assert_eq!(
            sql,
            "UPDATE users SET userName = ?, access_count = access_count + 1 WHERE uin = ?"
        );
        assert_eq!(args.len(), 2);
        assert_eq!(args[1], Value::Integer(7));
    }
}
