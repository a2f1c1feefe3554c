//! INSERT builder with conflict modes.

use rusqlite::types::Value;

use crate::Condition;

/// How to handle conflicting rows on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertWay {
    /// Plain `INSERT`; conflicts are errors.
    #[default]
    Insert,
    /// `INSERT OR IGNORE`; conflicting rows are skipped.
    InsertIgnore,
    /// `INSERT OR REPLACE`; conflicting rows are replaced.
    Replace,
}

impl InsertWay {
    fn verb(self) -> &'static str {
        match self {
            InsertWay::Insert => "INSERT",
            InsertWay::InsertIgnore => "INSERT OR IGNORE",
            InsertWay::Replace => "INSERT OR REPLACE",
        }
    }
}

/// Fluent builder for multi-row INSERT statements.
#[derive(Debug, Clone, Default)]
pub struct InsertCondition {
    table: String,
    way: InsertWay,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl InsertCondition {
    pub fn into_table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    pub fn way(mut self, way: InsertWay) -> Self {
        self.way = way;
        self
    }

    pub fn columns<I, S>(mut self, cols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = cols.into_iter().map(Into::into).collect();
        self
    }

    /// Append one row of values. Row width must match the column list; the
    /// builder renders whatever it is given and leaves width errors to the
    /// database.
    pub fn values<I, V>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
        self
    }
}

impl Condition for InsertCondition {
    fn build(&self) -> (String, Vec<Value>) {
        let mut sql = format!("{} INTO {}", self.way.verb(), self.table);
        if !self.columns.is_empty() {
            sql.push_str(" (");
            sql.push_str(&self.columns.join(", "));
            sql.push(')');
        }
        sql.push_str(" VALUES ");
        let mut args = Vec::new();
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push('(');
            for (j, value) in row.iter().enumerate() {
                if j > 0 {
                    sql.push_str(", ");
                }
                sql.push('?');
                args.push(value.clone());
            }
            sql.push(')');
        }
        (sql, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_row_insert() {
        let (sql, args) = InsertCondition::into_table("users")
            .columns(["uin", "userName"])
            .values([Value::Integer(7), Value::Text("ada".to_string())])
            .build();
        assert_eq!(sql, "INSERT INTO users (uin, userName) VALUES (?, ?)");
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn multi_row_insert_or_ignore() {
        let (sql, args) = InsertCondition::into_table("users")
            .way(InsertWay::InsertIgnore)
            .columns(["uin"])
            .values([1i64])
            .values([2i64])
            .build();
        assert_eq!(sql, "INSERT OR IGNORE INTO users (uin) VALUES (?), (?)");
        assert_eq!(args, vec![Value::Integer(1), Value::Integer(2)]);
    }

    #[test]
    fn replace_verb() {
        let (sql, _) = InsertCondition::into_table("users")
            .way(InsertWay::Replace)
            .columns(["uin"])
            .values([1i64])
            .build();
        assert!(sql.starts_with("INSERT OR REPLACE INTO users"));
    }
}
