//! Rule document schema
//!
//! A rule document is the full anonymization configuration: hook queries
//! plus an ordered list of table rules. It is loaded once before a run and
//! read-only afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Batch size used when a table rule doesn't set one
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// MySQL refuses prepared statements with more placeholders than this
pub const MAX_BOUND_PARAMETERS: usize = 65_535;

/// Root of a rule document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDocument {
    /// Raw SQL statements executed in order before any table rule
    #[serde(default)]
    pub before_queries: Vec<String>,

    /// Raw SQL statements executed in order after every table rule completed
    #[serde(default)]
    pub after_queries: Vec<String>,

    /// Table rules, in execution order
    #[serde(default)]
    pub tables: Vec<TableRule>,
}

/// One table to anonymize
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRule {
    /// Table name
    pub table_name: String,

    /// Column used to address rows and to order pagination
    pub primary_key: String,

    /// Rows updated per round-trip
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Optional SQL predicate restricting which rows are anonymized
    #[serde(default, rename = "where", skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,

    /// Column rules, in the order values are generated
    #[serde(default)]
    pub columns: Vec<ColumnRule>,
}

/// One column within a table rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRule {
    /// Target column name
    pub column: String,

    /// Generator name (e.g. `email`, `fullName`)
    pub generator: String,

    /// Generator-specific options, passed through untouched
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub generator_args: serde_json::Map<String, serde_json::Value>,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

impl RuleDocument {
    /// Validates the rule document
    ///
    /// Table existence and generator names are not checked here; both are
    /// resolved when the table rule runs.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid entry.
    pub fn validate(&self) -> Result<(), String> {
        for (index, query) in self.before_queries.iter().enumerate() {
            if query.trim().is_empty() {
                return Err(format!("beforeQueries[{index}] is empty"));
            }
        }
        for (index, query) in self.after_queries.iter().enumerate() {
            if query.trim().is_empty() {
                return Err(format!("afterQueries[{index}] is empty"));
            }
        }
        for (index, table) in self.tables.iter().enumerate() {
            table
                .validate()
                .map_err(|e| format!("tables[{index}]: {e}"))?;
        }
        Ok(())
    }

    /// Total number of column rules across all tables
    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }
}

impl TableRule {
    /// Creates a table rule with the default batch size and no columns
    pub fn new(table_name: impl Into<String>, primary_key: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            primary_key: primary_key.into(),
            batch_size: DEFAULT_BATCH_SIZE,
            filter: None,
            columns: Vec::new(),
        }
    }

    /// Sets the batch size
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Sets the row filter predicate
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Appends a column rule
    pub fn with_column(mut self, column: ColumnRule) -> Self {
        self.columns.push(column);
        self
    }

    /// Bound parameters of one full batch statement
    pub fn parameters_per_batch(&self) -> usize {
        self.batch_size
            .saturating_mul(self.columns.len().saturating_mul(2).saturating_add(1))
    }

    fn validate(&self) -> Result<(), String> {
        if self.table_name.trim().is_empty() {
            return Err("tableName must not be empty".to_string());
        }
        if self.primary_key.trim().is_empty() {
            return Err(format!(
                "primaryKey of table '{}' must not be empty",
                self.table_name
            ));
        }
        if self.batch_size == 0 {
            return Err(format!(
                "batchSize of table '{}' must be greater than 0",
                self.table_name
            ));
        }
        if let Some(filter) = &self.filter {
            if filter.trim().is_empty() {
                return Err(format!(
                    "where clause of table '{}' must not be empty when set",
                    self.table_name
                ));
            }
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if column.column.trim().is_empty() {
                return Err(format!(
                    "table '{}' has a column rule without a column name",
                    self.table_name
                ));
            }
            if column.generator.trim().is_empty() {
                return Err(format!(
                    "column '{}.{}' has no generator",
                    self.table_name, column.column
                ));
            }
            if column.column == self.primary_key {
                return Err(format!(
                    "column '{}.{}' is the primary key and cannot be anonymized",
                    self.table_name, column.column
                ));
            }
            if !seen.insert(column.column.as_str()) {
                return Err(format!(
                    "column '{}' appears more than once in table '{}'",
                    column.column, self.table_name
                ));
            }
        }

        let parameters = self.parameters_per_batch();
        if parameters > MAX_BOUND_PARAMETERS {
            return Err(format!(
                "batchSize {} of table '{}' needs {} bound parameters per statement (limit {}); lower the batch size",
                self.batch_size, self.table_name, parameters, MAX_BOUND_PARAMETERS
            ));
        }
        Ok(())
    }
}

impl ColumnRule {
    /// Creates a column rule without generator arguments
    pub fn new(column: impl Into<String>, generator: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            generator: generator.into(),
            generator_args: serde_json::Map::new(),
        }
    }

    /// Adds one generator argument
    pub fn with_arg(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.generator_args.insert(key.into(), value);
        self
    }
}
