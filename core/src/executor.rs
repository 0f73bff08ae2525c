//! The storage transport seam.

use async_trait::async_trait;

use crate::error::Result;
use crate::row::Row;

/// Executes statement text against the storage engine.
///
/// Implementations must accept multi-statement strings, including procedural
/// `DO` blocks, as a single round trip, and return the rows produced by every
/// statement in order. Errors are reported with the engine's own message and
/// are never retried by callers in this workspace.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, sql: &str) -> Result<Vec<Row>>;
}

#[async_trait]
impl<E: Executor + ?Sized> Executor for std::sync::Arc<E> {
    async fn execute(&self, sql: &str) -> Result<Vec<Row>> {
        (**self).execute(sql).await
    }
}
