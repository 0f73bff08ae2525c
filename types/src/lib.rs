//! Shared type definitions for tether
//!
//! This crate describes entities without touching storage:
//!
//! - [`ScalarKind`] - the closed set of scalar column kinds
//! - [`FieldDescriptor`] - scalar, reference, collection and reverse fields
//! - [`EntityDescription`] - a named, ordered set of field descriptors
//! - [`declare_column`] - the column type a stored field is declared with
//!
//! Everything here is plain data; validation and binding of reverse fields
//! happen when a schema is built.

mod entity;
mod field;
mod kind;
pub mod naming;
mod sql_type;

pub use entity::EntityDescription;
pub use field::FieldDescriptor;
pub use kind::ScalarKind;
pub use sql_type::{ColumnType, declare_column};

/// Prelude module for commonly used types
pub mod prelude {
    pub use crate::{ColumnType, EntityDescription, FieldDescriptor, ScalarKind};
}
