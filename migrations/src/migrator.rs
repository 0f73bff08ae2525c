//! Runtime execution of entity migrations.

use tether_core::{Executor, Result, tether_trace_migration, tether_trace_query};
use tether_types::EntityDescription;

use crate::postgres::entity_statements;

/// The compound migration registering one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    entity: String,
    statements: Vec<String>,
}

impl Migration {
    pub fn for_entity(desc: &EntityDescription) -> Self {
        Self {
            entity: desc.name().to_string(),
            statements: entity_statements(desc),
        }
    }

    #[inline]
    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    /// All statements as one multi-statement string
    pub fn sql(&self) -> String {
        self.statements.join("\n")
    }

    /// Runs the migration in a single round trip.
    pub async fn run(&self, executor: &dyn Executor) -> Result<()> {
        tether_trace_migration!("start", self.entity);
        let sql = self.sql();
        tether_trace_query!(self.entity, sql);
        if let Err(error) = executor.execute(&sql).await {
            tracing::warn!(entity = %self.entity, %error, "tether.migration failed");
            return Err(error);
        }
        tether_trace_migration!("done", self.entity);
        Ok(())
    }
}

/// Builds and runs the migration for `desc`.
pub async fn migrate(executor: &dyn Executor, desc: &EntityDescription) -> Result<()> {
    Migration::for_entity(desc).run(executor).await
}
