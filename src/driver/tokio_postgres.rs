//! Async PostgreSQL executor using [`tokio_postgres`].
//!
//! Statements go through the simple-query protocol, which accepts
//! multi-statement strings (including `DO` blocks) in one round trip and
//! returns every column as text.
//!
//! # Example
//!
//! ```no_run
//! use tether::driver::tokio_postgres::PgExecutor;
//! use tether::{Database, Entity, ScalarKind, Schema};
//!
//! #[tokio::main]
//! async fn main() -> tether::Result<()> {
//!     let executor = PgExecutor::connect("host=localhost user=postgres").await?;
//!     let registry = Schema::new()
//!         .entity(Entity::new("person").scalar("first_name", ScalarKind::text()))
//!         .build()?;
//!     let db = Database::new(executor, registry);
//!     db.ready().await?;
//!     Ok(())
//! }
//! ```

use ::tokio_postgres::{Client, NoTls, SimpleQueryMessage};
use async_trait::async_trait;
use tether_core::{Executor, Result, Row};

/// [`Executor`] over a [`tokio_postgres::Client`](Client).
#[derive(Debug)]
pub struct PgExecutor {
    client: Client,
}

impl PgExecutor {
    #[inline]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connects without TLS and drives the connection on a spawned task.
    ///
    /// Must be called inside a tokio runtime.
    pub async fn connect(config: &str) -> Result<Self> {
        let (client, connection) = ::tokio_postgres::connect(config, NoTls).await?;

        tokio::spawn(async move {
            if let Err(error) = connection.await {
                tracing::error!(%error, "tether.connection failed");
            }
        });

        Ok(Self::new(client))
    }

    /// Gets a reference to the underlying client
    #[inline]
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Executor for PgExecutor {
    async fn execute(&self, sql: &str) -> Result<Vec<Row>> {
        let messages = self.client.simple_query(sql).await?;
        let rows = messages
            .into_iter()
            .filter_map(|message| match message {
                SimpleQueryMessage::Row(row) => Some(
                    row.columns()
                        .iter()
                        .enumerate()
                        .map(|(i, column)| (column.name(), row.get(i)))
                        .collect::<Row>(),
                ),
                _ => None,
            })
            .collect();
        Ok(rows)
    }
}
