//! Entity declarations and the immutable registry built from them.
//!
//! Building is two-phase: [`Schema`] collects entity declarations in any
//! order, then [`Schema::build`] validates them, attaches reverse fields to
//! their targets and freezes the result into a [`Registry`].

mod binder;
mod builder;
mod declaration;
mod registry;

pub use builder::{Entity, Schema};
pub use declaration::{Declarations, FieldSpec, TypeSpec};
pub use registry::Registry;
