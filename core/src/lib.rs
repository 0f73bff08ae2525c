pub mod error;
pub mod executor;
pub mod row;
pub mod sql;
pub mod tracing;
pub mod value;

// Re-export key types and traits
pub use error::{Result, TetherError};
pub use executor::Executor;
pub use row::Row;
pub use sql::{Sql, SqlChunk, dollar_quote, validate_identifier};
pub use value::{RecordKey, Value};

#[doc(hidden)]
pub use ::tracing as __tracing;
