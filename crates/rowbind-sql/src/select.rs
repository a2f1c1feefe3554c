//! SELECT builder with projection override and pagination clearing.

use rusqlite::types::Value;

use crate::{push_clause, Condition};

/// Fluent builder for SELECT statements.
///
/// Predicates are raw fragments with `?` placeholders; their arguments are
/// collected in declaration order (WHERE args before HAVING args).
#[derive(Debug, Clone, Default)]
pub struct SelectCondition {
    table: String,
    projection: Vec<String>,
    distinct: bool,
    joins: Vec<String>,
    predicates: Vec<String>,
    where_args: Vec<Value>,
    group_by: Vec<String>,
    having: Vec<String>,
    having_args: Vec<Value>,
    order_by: Vec<String>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl SelectCondition {
    /// Start a select over `table`. With no explicit projection, renders `*`.
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Replace the projection with the given column list.
    pub fn columns<I, S>(mut self, cols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = cols.into_iter().map(Into::into).collect();
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Append a raw join clause, e.g. `"JOIN orders ON orders.uin = users.uin"`.
    pub fn join(mut self, clause: impl Into<String>) -> Self {
        self.joins.push(clause.into());
        self
    }

    /// AND-append a predicate fragment with no arguments.
    pub fn and_where(mut self, fragment: impl Into<String>) -> Self {
        self.predicates.push(fragment.into());
        self
    }

    /// AND-append a predicate fragment with positional arguments.
    pub fn and_where_with<I, V>(mut self, fragment: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.predicates.push(fragment.into());
        self.where_args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn group_by(mut self, expr: impl Into<String>) -> Self {
        self.group_by.push(expr.into());
        self
    }

    pub fn having(mut self, fragment: impl Into<String>) -> Self {
        self.having.push(fragment.into());
        self
    }

    pub fn having_with<I, V>(mut self, fragment: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.having.push(fragment.into());
        self.having_args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn order_by(mut self, expr: impl Into<String>) -> Self {
        self.order_by.push(expr.into());
        self
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// A row-count variant of this select: same table, joins and predicates,
    /// but the projection is overridden to `COUNT(*)` and pagination clauses
    /// are cleared.
    pub fn count_variant(&self) -> SelectCondition {
        let mut shadow = self.clone();
        shadow.projection = vec!["COUNT(*)".to_string()];
        shadow.distinct = false;
        shadow.limit = None;
        shadow.offset = None;
        shadow
    }
}

impl Condition for SelectCondition {
    fn build(&self) -> (String, Vec<Value>) {
        let mut sql = String::from("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }
        if self.projection.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&self.projection.join(", "));
        }
        sql.push_str(" FROM ");
        sql.push_str(&self.table);
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join);
        }
        push_clause(&mut sql, "WHERE", &self.predicates, " AND ");
        push_clause(&mut sql, "GROUP BY", &self.group_by, ", ");
        push_clause(&mut sql, "HAVING", &self.having, " AND ");
        push_clause(&mut sql, "ORDER BY", &self.order_by, ", ");
        if let Some(n) = self.limit {
            sql.push_str(&format!(" LIMIT {n}"));
        }
        if let Some(n) = self.offset {
            sql.push_str(&format!(" OFFSET {n}"));
        }

        let mut args = self.where_args.clone();
        args.extend(self.having_args.iter().cloned());
        (sql, args)
    }

    fn as_select(&self) -> Option<&SelectCondition> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_select_renders_star() {
        let (sql, args) = SelectCondition::from("users").build();
        assert_eq!(sql, "SELECT * FROM users");
        assert!(args.is_empty());
    }

    #[test]
    fn full_select_clause_order() {
        let (sql, args) = SelectCondition::from("users")
            .columns(["uin", "userName"])
            .join("JOIN orders ON orders.uin = users.uin")
            .and_where_with("age > ?", [30])
            .and_where("deleted = 0")
            .group_by("uin")
            .having_with("COUNT(*) > ?", [1])
            .order_by("uin DESC")
            .limit(10)
            .offset(20)
            .build();
        assert_eq!(
            sql,
            "SELECT uin, userName FROM users \
             JOIN orders ON orders.uin = users.uin \
             WHERE age > ? AND deleted = 0 \
             GROUP BY uin HAVING COUNT(*) > ? \
             ORDER BY uin DESC LIMIT 10 OFFSET 20"
        );
        assert_eq!(args.len(), 2);
        assert_eq!(args[0], Value::Integer(30));
        assert_eq!(args[1], Value::Integer(1));
    }

    #[test]
    fn count_variant_overrides_projection_and_clears_pagination() {
        let cond = SelectCondition::from("users")
            .columns(["uin", "userName"])
            .and_where_with("age > ?", [30])
            .order_by("uin")
            .limit(5)
            .offset(5);
        let (sql, args) = cond.count_variant().build();
        assert_eq!(
            sql,
            "SELECT COUNT(*) FROM users WHERE age > ? ORDER BY uin"
        );
        assert_eq!(args, vec![Value::Integer(30)]);
        // The original condition is untouched.
        let (orig, _) = cond.build();
        assert!(orig.contains("LIMIT 5"));
    }

    #[test]
    fn distinct_select() {
        let (sql, _) = SelectCondition::from("users")
            .columns(["userSeller"])
            .distinct()
            .build();
        assert_eq!(sql, "SELECT DISTINCT userSeller FROM users");
    }
}
