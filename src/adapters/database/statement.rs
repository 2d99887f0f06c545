//! Statements issued by the engine
//!
//! Each statement is a plain struct describing *what* to run. A
//! [`Connection`](super::Connection) implementation either renders it to
//! MySQL text with [`to_sql`](UpdateBatch::to_sql) or interprets it directly
//! (the in-memory connection used in tests does the latter).

use crate::domain::SqlValue;

/// SQL text plus its bound parameters, in placeholder order
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedStatement {
    /// Statement text with `?` placeholders
    pub sql: String,
    /// Values for the placeholders
    pub params: Vec<SqlValue>,
}

/// Quotes a MySQL identifier with backticks
///
/// Dotted names (`schema.table`) are quoted per segment. Backticks inside a
/// segment are doubled.
pub fn quote_identifier(name: &str) -> String {
    name.split('.')
        .map(|segment| format!("`{}`", segment.replace('`', "``")))
        .collect::<Vec<_>>()
        .join(".")
}

/// `SELECT COUNT(*)` over a table's row universe
#[derive(Debug, Clone, PartialEq)]
pub struct CountQuery {
    /// Table name
    pub table: String,
    /// Optional row predicate
    pub filter: Option<String>,
}

impl CountQuery {
    /// Creates a count query
    pub fn new(table: impl Into<String>, filter: Option<String>) -> Self {
        Self {
            table: table.into(),
            filter,
        }
    }

    /// Renders the statement
    pub fn to_sql(&self) -> RenderedStatement {
        let mut sql = format!("SELECT COUNT(*) FROM {}", quote_identifier(&self.table));
        if let Some(filter) = &self.filter {
            sql.push_str(&format!(" WHERE ({filter})"));
        }
        RenderedStatement {
            sql,
            params: Vec::new(),
        }
    }
}

/// One page of primary-key values, ascending, strictly after a cursor
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPageQuery {
    /// Table name
    pub table: String,
    /// Primary-key column
    pub primary_key: String,
    /// Last key of the previous page; `None` for the first page
    pub after: Option<SqlValue>,
    /// Page size
    pub limit: usize,
    /// Optional row predicate
    pub filter: Option<String>,
}

impl KeyPageQuery {
    /// Renders the statement
    pub fn to_sql(&self) -> RenderedStatement {
        let key = quote_identifier(&self.primary_key);
        let mut sql = format!("SELECT {key} FROM {}", quote_identifier(&self.table));
        let mut params = Vec::new();

        let mut conditions = Vec::new();
        if let Some(after) = &self.after {
            conditions.push(format!("{key} > ?"));
            params.push(after.clone());
        }
        if let Some(filter) = &self.filter {
            conditions.push(format!("({filter})"));
        }
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        sql.push_str(&format!(" ORDER BY {key} ASC LIMIT ?"));
        params.push(SqlValue::Int(self.limit as i64));

        RenderedStatement { sql, params }
    }
}

/// A row to rewrite: its key and one value per batch column
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRow {
    /// Primary-key value
    pub key: SqlValue,
    /// New values, aligned with [`UpdateBatch::columns`]
    pub values: Vec<SqlValue>,
}

/// One parameterized multi-row update
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateBatch {
    /// Table name
    pub table: String,
    /// Primary-key column
    pub primary_key: String,
    /// Columns being rewritten
    pub columns: Vec<String>,
    /// Rows, in key order
    pub rows: Vec<BatchRow>,
}

impl UpdateBatch {
    /// Number of rows in the batch
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the batch has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First and last key of the batch
    pub fn key_range(&self) -> Option<(&SqlValue, &SqlValue)> {
        Some((&self.rows.first()?.key, &self.rows.last()?.key))
    }

    /// Renders the statement
    ///
    /// ```text
    /// UPDATE t SET c1 = CASE pk WHEN ? THEN ? ... END, ... WHERE pk IN (?, ...)
    /// ```
    ///
    /// Parameters are the `(key, value)` pairs of each column in turn,
    /// followed by every key for the `IN` list.
    pub fn to_sql(&self) -> RenderedStatement {
        let key = quote_identifier(&self.primary_key);
        let mut params = Vec::with_capacity(self.rows.len() * (self.columns.len() * 2 + 1));

        let whens = vec!["WHEN ? THEN ?"; self.rows.len()].join(" ");
        let assignments: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(index, column)| {
                for row in &self.rows {
                    params.push(row.key.clone());
                    params.push(row.values.get(index).cloned().unwrap_or(SqlValue::Null));
                }
                format!("{} = CASE {key} {whens} END", quote_identifier(column))
            })
            .collect();

        params.extend(self.rows.iter().map(|row| row.key.clone()));
        let placeholders = vec!["?"; self.rows.len()].join(", ");

        let sql = format!(
            "UPDATE {} SET {} WHERE {key} IN ({placeholders})",
            quote_identifier(&self.table),
            assignments.join(", ")
        );

        RenderedStatement { sql, params }
    }
}
