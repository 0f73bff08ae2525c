//! Hydrated records.

use std::fmt;
use std::sync::Arc;

use tether_core::{RecordKey, Result, TetherError, Value};

use crate::relation::{Many, One};

/// The content of one record field.
#[derive(Debug)]
pub enum FieldValue {
    /// A decoded scalar column
    Scalar(Value),
    /// A reference, resolved on demand
    One(One),
    /// A collection or reverse field, resolved on demand
    Many(Many),
}

/// A stored row of some entity, with relation fields left unresolved.
///
/// Records are shared as `Arc<Record>`; within one resolution cache the same
/// `(entity, id)` always yields the same `Arc`.
pub struct Record {
    key: RecordKey,
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub(crate) fn new(key: RecordKey, fields: Vec<(String, FieldValue)>) -> Self {
        Self { key, fields }
    }

    #[inline]
    pub fn entity(&self) -> &str {
        &self.key.entity
    }

    #[inline]
    pub fn id(&self) -> i64 {
        self.key.id
    }

    #[inline]
    pub fn key(&self) -> &RecordKey {
        &self.key
    }

    /// A value referencing this record, for writing into reference or
    /// collection fields.
    pub fn reference(&self) -> Value {
        Value::Ref(self.key.clone())
    }

    /// Fields in declaration order, reverse fields last.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find_map(|(n, value)| (n == name).then_some(value))
    }

    fn require(&self, name: &str) -> Result<&FieldValue> {
        self.field(name).ok_or_else(|| TetherError::UnknownField {
            entity: self.entity().to_string(),
            field: name.to_string(),
        })
    }

    fn wrong_kind(&self, name: &str, expected: &'static str) -> TetherError {
        TetherError::RelationKind {
            entity: self.entity().to_string(),
            field: name.to_string(),
            expected,
        }
    }

    /// A scalar field's value.
    pub fn get(&self, name: &str) -> Result<&Value> {
        match self.require(name)? {
            FieldValue::Scalar(value) => Ok(value),
            FieldValue::One(_) | FieldValue::Many(_) => Err(self.wrong_kind(name, "scalar")),
        }
    }

    /// The handle of a reference field.
    pub fn one(&self, name: &str) -> Result<&One> {
        match self.require(name)? {
            FieldValue::One(one) => Ok(one),
            _ => Err(self.wrong_kind(name, "single-record")),
        }
    }

    /// The handle of a collection or reverse field.
    pub fn many(&self, name: &str) -> Result<&Many> {
        match self.require(name)? {
            FieldValue::Many(many) => Ok(many),
            _ => Err(self.wrong_kind(name, "multi-record")),
        }
    }

    /// Resolves a reference field.
    pub async fn related(&self, name: &str) -> Result<Option<Arc<Record>>> {
        self.one(name)?.resolve().await
    }

    /// Resolves a collection or reverse field.
    pub async fn related_all(&self, name: &str) -> Result<Vec<Arc<Record>>> {
        self.many(name)?.resolve().await
    }
}

impl From<&Record> for Value {
    fn from(record: &Record) -> Self {
        record.reference()
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Record");
        out.field("entity", &self.entity()).field("id", &self.id());
        for (name, value) in &self.fields {
            out.field(name, value);
        }
        out.finish()
    }
}
