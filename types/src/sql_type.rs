//! Column type declarations for stored fields.

use crate::field::FieldDescriptor;
use crate::kind::ScalarKind;
use crate::naming;

/// The type a stored field's column is declared with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    /// A built-in (or pass-through custom) type, as SQL text
    Primitive(String),
    /// A native enum type that must exist before the column is added
    Enum { type_name: String, values: Vec<String> },
}

impl ColumnType {
    /// Declared type name, unquoted
    pub fn type_name(&self) -> &str {
        match self {
            ColumnType::Primitive(sql) => sql,
            ColumnType::Enum { type_name, .. } => type_name,
        }
    }
}

/// Declares the column type for `field` on `entity`.
///
/// References are always `INTEGER`, whatever the referenced entity's id type.
/// Collections and reverse fields have no column and return `None`.
///
/// # Examples
///
/// ```
/// use tether_types::{ColumnType, FieldDescriptor, ScalarKind, declare_column};
///
/// let name = FieldDescriptor::Scalar(ScalarKind::varchar(50));
/// assert_eq!(
///     declare_column("person", "first_name", &name),
///     Some(ColumnType::Primitive("VARCHAR(50)".into()))
/// );
/// ```
pub fn declare_column(entity: &str, field: &str, desc: &FieldDescriptor) -> Option<ColumnType> {
    match desc {
        FieldDescriptor::Scalar(ScalarKind::Enum(values)) => Some(ColumnType::Enum {
            type_name: naming::enum_type_name(entity, field),
            values: values.clone(),
        }),
        FieldDescriptor::Scalar(kind) => Some(ColumnType::Primitive(kind.to_sql_type())),
        FieldDescriptor::Reference { .. } => {
            Some(ColumnType::Primitive(ScalarKind::Integer.to_sql_type()))
        }
        FieldDescriptor::Collection { .. }
        | FieldDescriptor::ReverseOf { .. }
        | FieldDescriptor::ReverseJoinOf { .. } => None,
    }
}
