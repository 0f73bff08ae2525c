//! # Tether
//!
//! Entity mapping for PostgreSQL with lazily resolved relations.
//!
//! Entities are declared with typed fields, including references, many-to-many
//! collections and reverse views of both. Opening a [`Database`] provisions
//! and upgrades storage for every entity. Records read back through a
//! [`Repository`] carry deferred handles for their relations, and every record
//! reached from one call is hydrated once, so walking a cycle of relations
//! returns to the same `Arc`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use tether::{Database, Entity, ScalarKind, Schema, Value};
//! use tether::driver::tokio_postgres::PgExecutor;
//!
//! # #[tokio::main]
//! # async fn main() -> tether::Result<()> {
//! let registry = Schema::new()
//!     .entity(
//!         Entity::new("person")
//!             .scalar("first_name", ScalarKind::varchar(50))
//!             .reference_as("boss", "person", "reports"),
//!     )
//!     .entity(
//!         Entity::new("shift")
//!             .scalar("title", ScalarKind::text())
//!             .collection_as("workers", "person", "shifts_worked"),
//!     )
//!     .build()?;
//!
//! let db = Database::new(PgExecutor::connect("host=localhost user=postgres").await?, registry);
//! let people = db.repository("person")?;
//! let shifts = db.repository("shift")?;
//!
//! let al = people.create([("first_name", Value::from("Al"))]).await?;
//! let jake = people
//!     .create([("first_name", Value::from("Jake")), ("boss", al.reference())])
//!     .await?;
//! shifts
//!     .create([
//!         ("title", Value::from("Goat shed")),
//!         ("workers", Value::List(vec![jake.reference(), al.reference()])),
//!     ])
//!     .await?;
//!
//! let jake = people.get(jake.id()).await?.expect("jake exists");
//! let boss = jake.related("boss").await?.expect("jake has a boss");
//! for shift in boss.related_all("shifts_worked").await? {
//!     println!("{} works {:?}", boss.get("first_name")?.as_str().unwrap_or(""), shift.get("title")?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Crates
//!
//! | Crate | Contents |
//! |-------|----------|
//! | `tether-core` | values, rows, statement builder, errors, the [`Executor`] seam |
//! | `tether-types` | scalar kinds, field descriptors, column type declaration |
//! | `tether-postgres` | literal encoding, column decoding, statement shapes |
//! | `tether-migrations` | per-entity incremental migrations |

mod cache;
mod config;
mod database;
pub mod driver;
mod hydrate;
mod record;
mod relation;
mod repository;
pub mod schema;

pub use cache::ResolutionCache;
pub use config::{Config, DATABASE_URL_ENV, DatabaseConfig};
pub use database::Database;
pub use record::{FieldValue, Record};
pub use relation::{Many, One};
pub use repository::Repository;
pub use schema::{Declarations, Entity, FieldSpec, Registry, Schema, TypeSpec};

pub use tether_core::{Executor, RecordKey, Result, Row, TetherError, Value};
pub use tether_types::{EntityDescription, FieldDescriptor, ScalarKind};

/// Prelude for declaring schemas and working with records
pub mod prelude {
    pub use crate::{
        Database, Entity, Executor, FieldValue, Record, RecordKey, Repository, ResolutionCache,
        Result, ScalarKind, Schema, TetherError, Value,
    };
}
