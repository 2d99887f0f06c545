//! In-memory database double shared by the integration tests
//!
//! Tables hold rows keyed by an integer or text primary key. Text keys sort
//! case-insensitively, like MySQL's default collation. Every call made
//! through a [`Connection`] is appended to an event log so tests can check
//! ordering, batch sizes and cursor progression.

#![allow(dead_code)]

use anonymizer::adapters::database::{
    Connection, ConnectionProvider, CountQuery, KeyPageQuery, UpdateBatch,
};
use anonymizer::domain::{DatabaseError, SqlValue};
use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub type Row = BTreeMap<String, SqlValue>;

/// Stands in for a `where` predicate the double cannot parse
pub type Predicate = Arc<dyn Fn(&Row) -> bool + Send + Sync>;

/// One call observed by the double
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Hook(String),
    Count(String),
    Fetch {
        table: String,
        after: Option<SqlValue>,
        limit: usize,
    },
    Update {
        table: String,
        keys: Vec<SqlValue>,
    },
    Close,
}

#[derive(Default)]
struct State {
    tables: BTreeMap<String, Vec<(SqlValue, Row)>>,
    filters: HashMap<(String, String), Predicate>,
    deleted_after_count: HashMap<String, Vec<SqlValue>>,
    deleted_after_fetch: HashMap<String, Vec<SqlValue>>,
    events: Vec<Event>,
    failing_hooks: HashSet<String>,
    failing_updates: HashSet<String>,
    unmatched_updates: HashSet<String>,
    panicking_updates: HashSet<String>,
    refuse_connections: bool,
    fail_close: bool,
    closes: usize,
}

/// Shared in-memory database; clones see the same data
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    state: Arc<Mutex<State>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds `count` rows with keys `1..=count` and the given columns
    pub fn with_table(self, table: &str, count: i64, columns: &[&str]) -> Self {
        self.with_keys(table, (1..=count).map(SqlValue::Int), columns)
    }

    /// Adds one row per text key with the given columns
    pub fn with_text_keys(self, table: &str, keys: &[&str], columns: &[&str]) -> Self {
        self.with_keys(table, keys.iter().copied().map(SqlValue::from), columns)
    }

    fn with_keys(
        self,
        table: &str,
        keys: impl IntoIterator<Item = SqlValue>,
        columns: &[&str],
    ) -> Self {
        {
            let mut state = self.state();
            let rows = state.tables.entry(table.to_string()).or_default();
            for key in keys {
                let label = key.as_text().map_or_else(|| key.to_string(), str::to_string);
                let row: Row = columns
                    .iter()
                    .map(|c| (c.to_string(), SqlValue::Text(format!("{c}-{label}"))))
                    .collect();
                rows.push((key, row));
            }
            rows.sort_by(|a, b| collate(&a.0, &b.0));
        }
        self
    }

    /// Registers how `table` evaluates the `where` clause `filter`
    pub fn with_filter(
        self,
        table: &str,
        filter: &str,
        predicate: impl Fn(&Row) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.state()
            .filters
            .insert((table.to_string(), filter.to_string()), Arc::new(predicate));
        self
    }

    /// Deletes the row keyed `key` right after `table` is counted
    pub fn delete_after_count(self, table: &str, key: SqlValue) -> Self {
        self.state()
            .deleted_after_count
            .entry(table.to_string())
            .or_default()
            .push(key);
        self
    }

    /// Deletes the row keyed `key` right after a page containing it is fetched
    pub fn delete_after_fetch(self, table: &str, key: SqlValue) -> Self {
        self.state()
            .deleted_after_fetch
            .entry(table.to_string())
            .or_default()
            .push(key);
        self
    }

    /// Makes `statement` fail when executed as a hook
    pub fn fail_hook(self, statement: &str) -> Self {
        self.state().failing_hooks.insert(statement.to_string());
        self
    }

    /// Makes every batched update of `table` fail
    pub fn fail_updates(self, table: &str) -> Self {
        self.state().failing_updates.insert(table.to_string());
        self
    }

    /// Makes every batched update of `table` match no rows
    pub fn match_nothing(self, table: &str) -> Self {
        self.state().unmatched_updates.insert(table.to_string());
        self
    }

    /// Makes every batched update of `table` panic
    pub fn panic_on_update(self, table: &str) -> Self {
        self.state().panicking_updates.insert(table.to_string());
        self
    }

    pub fn refuse_connections(self) -> Self {
        self.state().refuse_connections = true;
        self
    }

    pub fn fail_close(self) -> Self {
        self.state().fail_close = true;
        self
    }

    pub fn connection(&self) -> Box<dyn Connection> {
        Box::new(MemoryConnection {
            db: self.clone(),
            closed: false,
        })
    }

    pub fn events(&self) -> Vec<Event> {
        self.state().events.clone()
    }

    pub fn closes(&self) -> usize {
        self.state().closes
    }

    pub fn row(&self, table: &str, id: i64) -> Option<Row> {
        self.row_by_key(table, &SqlValue::Int(id))
    }

    pub fn row_by_key(&self, table: &str, key: &SqlValue) -> Option<Row> {
        self.state()
            .tables
            .get(table)?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, row)| row.clone())
    }

    /// Keys currently stored in `table`, in collation order
    pub fn keys(&self, table: &str) -> Vec<SqlValue> {
        self.state()
            .tables
            .get(table)
            .map(|rows| rows.iter().map(|(key, _)| key.clone()).collect())
            .unwrap_or_default()
    }

    pub fn hooks(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Hook(sql) => Some(sql),
                _ => None,
            })
            .collect()
    }

    /// Integer key lists of every update issued against `table`, in order
    pub fn batches(&self, table: &str) -> Vec<Vec<i64>> {
        self.batch_keys(table)
            .into_iter()
            .map(|keys| {
                keys.iter()
                    .filter_map(|key| match key {
                        SqlValue::Int(id) => Some(*id),
                        _ => None,
                    })
                    .collect()
            })
            .collect()
    }

    /// Key lists of every update issued against `table`, in order
    pub fn batch_keys(&self, table: &str) -> Vec<Vec<SqlValue>> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Update { table: t, keys } if t == table => Some(keys),
                _ => None,
            })
            .collect()
    }

    /// Whether any call other than a hook or close touched `table`
    pub fn touched(&self, table: &str) -> bool {
        self.events().iter().any(|e| match e {
            Event::Count(t) => t == table,
            Event::Fetch { table: t, .. } | Event::Update { table: t, .. } => t == table,
            _ => false,
        })
    }
}

#[async_trait]
impl ConnectionProvider for MemoryDatabase {
    async fn connect(&self) -> Result<Box<dyn Connection>, DatabaseError> {
        if self.state().refuse_connections {
            return Err(DatabaseError::ConnectionFailed(
                "Access denied for user 'anonymizer'@'localhost'".to_string(),
            ));
        }
        Ok(self.connection())
    }
}

/// Connection handed out by [`MemoryDatabase`]
pub struct MemoryConnection {
    db: MemoryDatabase,
    closed: bool,
}

impl MemoryConnection {
    fn ensure_open(&self) -> Result<(), DatabaseError> {
        if self.closed {
            Err(DatabaseError::Closed)
        } else {
            Ok(())
        }
    }
}

fn missing_table(table: &str) -> DatabaseError {
    DatabaseError::QueryFailed(format!("Table '{table}' doesn't exist"))
}

/// Key order: integers numerically, text case-insensitively
fn collate(a: &SqlValue, b: &SqlValue) -> Ordering {
    match (a, b) {
        (SqlValue::Text(a), SqlValue::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
        _ => a.cursor_cmp(b).unwrap_or(Ordering::Equal),
    }
}

fn visible<'a>(
    state: &'a State,
    table: &str,
    filter: Option<&String>,
) -> Result<Vec<&'a (SqlValue, Row)>, DatabaseError> {
    let rows = state.tables.get(table).ok_or_else(|| missing_table(table))?;
    let predicate = match filter {
        None => None,
        Some(filter) => Some(
            state
                .filters
                .get(&(table.to_string(), filter.clone()))
                .ok_or_else(|| {
                    DatabaseError::QueryFailed(format!("Unknown column in where clause '{filter}'"))
                })?,
        ),
    };
    Ok(rows
        .iter()
        .filter(|(_, row)| predicate.map_or(true, |p| p(row)))
        .collect())
}

#[async_trait]
impl Connection for MemoryConnection {
    async fn execute_hook(&mut self, sql: &str) -> Result<u64, DatabaseError> {
        self.ensure_open()?;
        let mut state = self.db.state();
        state.events.push(Event::Hook(sql.to_string()));

        if state.failing_hooks.contains(sql) {
            return Err(DatabaseError::QueryFailed(format!("hook rejected: {sql}")));
        }
        if let Some(table) = sql.strip_prefix("DROP TABLE ") {
            let table = table.trim().trim_end_matches(';');
            return match state.tables.remove(table) {
                Some(_) => Ok(0),
                None => Err(DatabaseError::QueryFailed(format!(
                    "Unknown table '{table}'"
                ))),
            };
        }
        Ok(0)
    }

    async fn count_rows(&mut self, query: &CountQuery) -> Result<u64, DatabaseError> {
        self.ensure_open()?;
        let mut state = self.db.state();
        state.events.push(Event::Count(query.table.clone()));
        let counted = visible(&state, &query.table, query.filter.as_ref())?.len() as u64;

        if let Some(doomed) = state.deleted_after_count.remove(&query.table) {
            if let Some(rows) = state.tables.get_mut(&query.table) {
                rows.retain(|(key, _)| !doomed.contains(key));
            }
        }
        Ok(counted)
    }

    async fn fetch_keys(&mut self, query: &KeyPageQuery) -> Result<Vec<SqlValue>, DatabaseError> {
        self.ensure_open()?;
        let mut state = self.db.state();
        state.events.push(Event::Fetch {
            table: query.table.clone(),
            after: query.after.clone(),
            limit: query.limit,
        });
        let keys: Vec<SqlValue> = visible(&state, &query.table, query.filter.as_ref())?
            .into_iter()
            .map(|(key, _)| key)
            .filter(|key| {
                query
                    .after
                    .as_ref()
                    .map_or(true, |after| collate(key, after) == Ordering::Greater)
            })
            .take(query.limit)
            .cloned()
            .collect();

        if let Some(doomed) = state.deleted_after_fetch.get(&query.table).cloned() {
            if let Some(rows) = state.tables.get_mut(&query.table) {
                rows.retain(|(key, _)| !(doomed.contains(key) && keys.contains(key)));
            }
        }
        Ok(keys)
    }

    async fn update_batch(&mut self, batch: &UpdateBatch) -> Result<u64, DatabaseError> {
        self.ensure_open()?;
        let keys: Vec<SqlValue> = batch.rows.iter().map(|row| row.key.clone()).collect();

        let panics = {
            let mut state = self.db.state();
            state.events.push(Event::Update {
                table: batch.table.clone(),
                keys: keys.clone(),
            });
            state.panicking_updates.contains(&batch.table)
        };
        if panics {
            panic!("driver crashed while updating {}", batch.table);
        }

        let mut state = self.db.state();
        if state.failing_updates.contains(&batch.table) {
            return Err(DatabaseError::QueryFailed(format!(
                "Data too long for column in table '{}'",
                batch.table
            )));
        }
        if state.unmatched_updates.contains(&batch.table) {
            return Ok(0);
        }

        let rows = state
            .tables
            .get_mut(&batch.table)
            .ok_or_else(|| missing_table(&batch.table))?;
        let mut matched = 0;
        for (key, row) in keys.iter().zip(&batch.rows) {
            if let Some((_, stored)) = rows.iter_mut().find(|(k, _)| k == key) {
                for (column, value) in batch.columns.iter().zip(&row.values) {
                    stored.insert(column.clone(), value.clone());
                }
                matched += 1;
            }
        }
        Ok(matched)
    }

    async fn close(&mut self) -> Result<(), DatabaseError> {
        self.ensure_open()?;
        self.closed = true;
        let mut state = self.db.state();
        state.events.push(Event::Close);
        state.closes += 1;
        if state.fail_close {
            return Err(DatabaseError::QueryFailed("connection reset by peer".to_string()));
        }
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
