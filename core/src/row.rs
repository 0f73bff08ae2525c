//! Raw result rows.
//!
//! Rows come back from the simple-query protocol, so every column is either
//! SQL `NULL` or its text representation. Decoding into typed [`Value`]s
//! happens later, per declared field kind.
//!
//! [`Value`]: crate::Value

use std::collections::BTreeMap;

use crate::error::{Result, TetherError};

/// A result row: column name to optional text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    columns: BTreeMap<String, Option<String>>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style column setter, mostly useful in tests and drivers.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.columns.insert(column.into(), Some(value.into()));
        self
    }

    pub fn with_null(mut self, column: impl Into<String>) -> Self {
        self.columns.insert(column.into(), None);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: Option<String>) {
        self.columns.insert(column.into(), value);
    }

    /// Text of a column; `None` when the column is missing or NULL.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns.get(column).and_then(|v| v.as_deref())
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// The storage-assigned `id` column.
    pub fn id(&self) -> Result<i64> {
        let raw = self
            .get("id")
            .ok_or_else(|| TetherError::decode("id", "NULL", "row has no id"))?;
        raw.parse::<i64>()
            .map_err(|e| TetherError::decode("id", raw, e))
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<K, V> FromIterator<(K, Option<V>)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.map(Into::into)))
                .collect(),
        }
    }
}
