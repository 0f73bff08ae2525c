//! Literal encoding.
//!
//! This is a textual, non-parameterized encoder: every function returns SQL
//! literal text ready to be spliced into a statement. It is pure and never
//! performs I/O. Identifiers are not its concern; they are validated when the
//! schema is built.

use chrono::{NaiveDate, NaiveDateTime};
use tether_core::Value;
use tether_types::{FieldDescriptor, ScalarKind};
use thiserror::Error;

/// Why a value could not be encoded for a field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// A reference was given something other than a record (or NULL)
    #[error("expected a record reference, got {0}")]
    MissingIdentity(&'static str),

    /// Collections and reverse fields have no single literal form
    #[error("relation fields have no literal form")]
    NotALiteral,
}

/// Encodes `value` for a field declared as `desc`.
///
/// References encode to the referenced record's id. Scalars dispatch on the
/// declared kind and fall back to [`literal`] when the value does not match it.
///
/// # Examples
///
/// ```
/// use tether_core::{RecordKey, Value};
/// use tether_postgres::encode;
/// use tether_types::{FieldDescriptor, ScalarKind};
///
/// let name = FieldDescriptor::Scalar(ScalarKind::text());
/// assert_eq!(encode(&"It's".into(), &name).unwrap(), "'It''s'");
///
/// let boss = FieldDescriptor::Reference { target: "person".into(), reverse: None };
/// let al = Value::Ref(RecordKey::new("person", 2));
/// assert_eq!(encode(&al, &boss).unwrap(), "2");
/// ```
pub fn encode(value: &Value, desc: &FieldDescriptor) -> Result<String, EncodeError> {
    match desc {
        FieldDescriptor::Reference { .. } => encode_reference(value),
        FieldDescriptor::Scalar(kind) => Ok(encode_scalar(value, kind)),
        FieldDescriptor::Collection { .. }
        | FieldDescriptor::ReverseOf { .. }
        | FieldDescriptor::ReverseJoinOf { .. } => Err(EncodeError::NotALiteral),
    }
}

/// Encodes a reference value as the referenced id.
pub fn encode_reference(value: &Value) -> Result<String, EncodeError> {
    match value {
        Value::Ref(key) => Ok(key.id.to_string()),
        Value::Null => Ok("NULL".to_string()),
        other => Err(EncodeError::MissingIdentity(other.kind_name())),
    }
}

/// Encodes a value for a scalar column of the given kind.
pub fn encode_scalar(value: &Value, kind: &ScalarKind) -> String {
    match (kind, value) {
        (_, Value::Null) => "NULL".to_string(),
        (ScalarKind::Text { .. } | ScalarKind::Enum(_) | ScalarKind::Custom(_), Value::Text(s)) => {
            encode_text(s)
        }
        (ScalarKind::Timestamp | ScalarKind::Timestamptz, Value::Timestamp(t)) => {
            encode_timestamp(t)
        }
        (ScalarKind::Timestamp | ScalarKind::Date, Value::Date(d)) => encode_date(d),
        (ScalarKind::Point, Value::Point(x, y)) => encode_point(*x, *y),
        (ScalarKind::Point, Value::List(items)) => match items.as_slice() {
            [x, y] => match (x.as_f64(), y.as_f64()) {
                (Some(x), Some(y)) => encode_point(x, y),
                _ => literal(value),
            },
            _ => literal(value),
        },
        (ScalarKind::Money, Value::Decimal(d)) => encode_text(&d.to_string()),
        (ScalarKind::Money, Value::Int(n)) => encode_text(&n.to_string()),
        (ScalarKind::Money, Value::Float(f)) if f.is_finite() => encode_text(&f.to_string()),
        (ScalarKind::Json | ScalarKind::Jsonb, Value::Json(json)) => encode_text(&json.to_string()),
        _ => literal(value),
    }
}

/// Generic literal for a value, independent of any declared kind.
pub fn literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Int(n) => n.to_string(),
        Value::Float(f) => float_literal(*f),
        Value::Decimal(d) => d.to_string(),
        Value::Text(s) => encode_text(s),
        Value::Timestamp(t) => encode_timestamp(t),
        Value::TimestampTz(t) => format!("'{}'", t.format("%Y-%m-%d %H:%M:%S%.f%:z")),
        Value::Date(d) => encode_date(d),
        Value::Time(t) => format!("'{}'", t.format("%H:%M:%S%.f")),
        Value::Point(x, y) => encode_point(*x, *y),
        Value::Json(json) => encode_text(&json.to_string()),
        Value::List(items) => {
            let parts: Vec<String> = items.iter().map(literal).collect();
            format!("({})", parts.join(","))
        }
        Value::Ref(key) => key.id.to_string(),
    }
}

/// Quotes text, doubling single quotes and backslashes.
///
/// The `E` escape-string prefix is only added when a backslash was present,
/// so plain strings stay in the standard quoted form.
pub fn encode_text(s: &str) -> String {
    let backslash = s.contains('\\');
    let escaped = s.replace('\'', "''").replace('\\', "\\\\");
    if backslash {
        format!("E'{escaped}'")
    } else {
        format!("'{escaped}'")
    }
}

/// `'YYYY-MM-DD HH:MM:SS[.ffffff]'`
pub fn encode_timestamp(t: &NaiveDateTime) -> String {
    format!("'{}'", t.format("%Y-%m-%d %H:%M:%S%.f"))
}

/// `'YYYY-MM-DD'`
pub fn encode_date(d: &NaiveDate) -> String {
    format!("'{}'", d.format("%Y-%m-%d"))
}

/// `point(x,y)`, each component encoded as its own literal
pub fn encode_point(x: f64, y: f64) -> String {
    format!("point({},{})", float_literal(x), float_literal(y))
}

fn float_literal(f: f64) -> String {
    if f.is_nan() {
        "'NaN'".to_string()
    } else if f.is_infinite() {
        if f > 0.0 {
            "'Infinity'".to_string()
        } else {
            "'-Infinity'".to_string()
        }
    } else {
        f.to_string()
    }
}
