//! Tether Migrations - incremental schema registration
//!
//! Each entity gets one idempotent, additive migration:
//!
//! - its table, holding only the storage-assigned `id` when first created
//! - one join table per collection field
//! - a procedural block that adds every stored column the table lacks,
//!   creating native enum types on the way
//!
//! Columns are never altered or dropped and there are no down migrations.
//! Running a migration twice is a no-op the second time.
//!
//! ```
//! use tether_migrations::Migration;
//! use tether_types::{EntityDescription, FieldDescriptor, ScalarKind};
//!
//! let mut person = EntityDescription::new("person");
//! person.insert("first_name", FieldDescriptor::Scalar(ScalarKind::varchar(50)));
//!
//! let migration = Migration::for_entity(&person);
//! assert!(migration.sql().starts_with(r#"CREATE TABLE IF NOT EXISTS "person" (id SERIAL PRIMARY KEY);"#));
//! ```

mod migrator;
pub mod postgres;

pub use migrator::{Migration, migrate};
