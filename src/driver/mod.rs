//! Storage drivers.

#[cfg(feature = "tokio-postgres")]
pub mod tokio_postgres;
