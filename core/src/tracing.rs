//! Tracing utilities for query and migration observability.
//!
//! The macros expand to `tracing` events through this crate's re-export, so
//! callers do not need their own `tracing` dependency.

/// Emit a debug-level tracing event with the SQL text and the entity it serves.
///
/// ```ignore
/// tether_trace_query!("person", &sql);
/// ```
#[macro_export]
macro_rules! tether_trace_query {
    ($entity:expr, $sql:expr) => {
        $crate::__tracing::debug!(entity = %$entity, sql = %$sql, "tether.query");
    };
}

/// Emit an info-level tracing event for migration lifecycle (start, done).
///
/// ```ignore
/// tether_trace_migration!("start", "person");
/// ```
#[macro_export]
macro_rules! tether_trace_migration {
    ($event:literal, $entity:expr) => {
        $crate::__tracing::info!(event = $event, entity = %$entity, "tether.migration");
    };
}
