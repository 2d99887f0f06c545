//! SQL values exchanged with the database
//!
//! [`SqlValue`] carries both primary-key cursor values read from a table and
//! synthetic values produced by the generators.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A single bindable SQL value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    /// SQL `NULL`
    Null,
    /// Boolean (`TINYINT(1)` in MySQL)
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Unsigned integer past `i64::MAX` (`BIGINT UNSIGNED`)
    UInt(u64),
    /// Floating point
    Float(f64),
    /// Text
    Text(String),
}

impl SqlValue {
    /// Whether the value is SQL `NULL`
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Borrow the text if the value is [`SqlValue::Text`]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Client-side ordering of primary-key cursors
    ///
    /// Numbers compare numerically. Text keys are ordered by the column
    /// collation on the server, so text has no client-side order; neither do
    /// values of different kinds. Both yield `None`.
    pub fn cursor_cmp(&self, other: &SqlValue) -> Option<Ordering> {
        use SqlValue::*;
        match (self, other) {
            (Null, Null) => Some(Ordering::Equal),
            (Bool(a), Bool(b)) => Some(a.cmp(b)),
            (Int(a), Int(b)) => Some(a.cmp(b)),
            (UInt(a), UInt(b)) => Some(a.cmp(b)),
            (Int(a), UInt(b)) => Some(i128::from(*a).cmp(&i128::from(*b))),
            (UInt(a), Int(b)) => Some(i128::from(*a).cmp(&i128::from(*b))),
            (Float(a), Float(b)) => Some(a.total_cmp(b)),
            (Int(a), Float(b)) => Some((*a as f64).total_cmp(b)),
            (Float(a), Int(b)) => Some(a.total_cmp(&(*b as f64))),
            _ => None,
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("NULL"),
            SqlValue::Bool(b) => write!(f, "{b}"),
            SqlValue::Int(i) => write!(f, "{i}"),
            SqlValue::UInt(u) => write!(f, "{u}"),
            SqlValue::Float(x) => write!(f, "{x}"),
            SqlValue::Text(s) => write!(f, "'{s}'"),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<u64> for SqlValue {
    /// Narrows to [`SqlValue::Int`] when the value fits
    fn from(v: u64) -> Self {
        i64::try_from(v).map_or(SqlValue::UInt(v), SqlValue::Int)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}
