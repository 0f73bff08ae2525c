//! The database facade and per-entity readiness gates.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt, Shared};
use tether_core::{Executor, Result, Row, TetherError, tether_trace_query};
use tether_migrations::migrate;
use tether_postgres::builder::select_by_id;
use tether_types::EntityDescription;

use crate::cache::ResolutionCache;
use crate::hydrate::{Preset, hydrate};
use crate::record::Record;
use crate::repository::Repository;
use crate::schema::Registry;

/// Memoized outcome of an entity's migration.
type Gate = Shared<BoxFuture<'static, std::result::Result<(), Arc<TetherError>>>>;

/// State shared by the database, its repositories and every relation handle.
pub(crate) struct Inner {
    executor: Arc<dyn Executor>,
    registry: Registry,
    gates: HashMap<String, Gate>,
}

impl Inner {
    pub(crate) fn registry(&self) -> &Registry {
        &self.registry
    }

    pub(crate) fn description(&self, entity: &str) -> Result<&Arc<EntityDescription>> {
        self.registry
            .get(entity)
            .ok_or_else(|| TetherError::UnknownEntity(entity.to_string()))
    }

    /// Waits for the entity's migration. A failed migration fails every call.
    pub(crate) async fn ready(&self, entity: &str) -> Result<()> {
        let gate = self
            .gates
            .get(entity)
            .ok_or_else(|| TetherError::UnknownEntity(entity.to_string()))?;
        gate.clone()
            .await
            .map_err(|source| TetherError::SchemaNotReady {
                entity: entity.to_string(),
                source,
            })
    }

    /// Runs `sql` for `entity` once its schema is ready.
    pub(crate) async fn fetch(&self, entity: &str, sql: &str) -> Result<Vec<Row>> {
        self.ready(entity).await?;
        tether_trace_query!(entity, sql);
        self.executor.execute(sql).await.inspect_err(|error| {
            tracing::warn!(entity, %error, "tether.query failed");
        })
    }

    /// Loads one record by id, consulting the cache first.
    pub(crate) async fn get(
        self: &Arc<Self>,
        entity: &str,
        id: i64,
        cache: &ResolutionCache,
    ) -> Result<Option<Arc<Record>>> {
        if let Some(record) = cache.lookup(entity, id) {
            return Ok(Some(record));
        }
        let desc = Arc::clone(self.description(entity)?);
        let rows = self.fetch(entity, &select_by_id(entity, id).sql()).await?;
        rows.first()
            .map(|row| hydrate(self, &desc, row, cache, &None))
            .transpose()
    }

    /// Runs `sql` and hydrates every row as a record of `entity`.
    pub(crate) async fn load(
        self: &Arc<Self>,
        entity: &str,
        sql: &str,
        cache: &ResolutionCache,
        preset: Preset<'_>,
    ) -> Result<Vec<Arc<Record>>> {
        let desc = Arc::clone(self.description(entity)?);
        let rows = self.fetch(entity, sql).await?;
        rows.iter()
            .map(|row| hydrate(self, &desc, row, cache, &preset))
            .collect()
    }
}

/// A registry bound to storage.
///
/// Opening a database starts one migration per entity. When called inside a
/// tokio runtime the migrations are spawned right away; otherwise each runs
/// the first time its entity is used. Either way every repository operation
/// waits for its entity's migration, and a failed migration is never retried.
///
/// Cloning is cheap and shares the gates.
///
/// ```no_run
/// # async fn run(executor: impl tether::Executor + 'static) -> tether::Result<()> {
/// use tether::{Database, Entity, ScalarKind, Schema, Value};
///
/// let registry = Schema::new()
///     .entity(Entity::new("person").scalar("first_name", ScalarKind::varchar(50)))
///     .build()?;
/// let db = Database::new(executor, registry);
/// let people = db.repository("person")?;
/// let jake = people.create([("first_name", Value::from("Jake"))]).await?;
/// assert_eq!(people.get(jake.id()).await?.map(|p| p.id()), Some(jake.id()));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Database {
    inner: Arc<Inner>,
}

impl Database {
    pub fn new(executor: impl Executor + 'static, registry: Registry) -> Self {
        Self::with_executor(Arc::new(executor), registry)
    }

    pub fn with_executor(executor: Arc<dyn Executor>, registry: Registry) -> Self {
        let runtime = tokio::runtime::Handle::try_current().ok();
        let gates = registry
            .iter()
            .map(|desc| {
                let gate = migration_gate(Arc::clone(&executor), Arc::clone(desc));
                if let Some(handle) = &runtime {
                    handle.spawn(gate.clone());
                }
                (desc.name().to_string(), gate)
            })
            .collect();
        Self {
            inner: Arc::new(Inner {
                executor,
                registry,
                gates,
            }),
        }
    }

    /// Opens a database from configuration over `tokio-postgres`.
    #[cfg(feature = "tokio-postgres")]
    pub async fn connect(config: &crate::Config) -> Result<Self> {
        let registry = config.registry()?;
        let executor = crate::driver::tokio_postgres::PgExecutor::connect(&config.database_url()?).await?;
        Ok(Self::new(executor, registry))
    }

    pub fn registry(&self) -> &Registry {
        self.inner.registry()
    }

    /// The repository for `entity`.
    pub fn repository(&self, entity: &str) -> Result<Repository> {
        let desc = Arc::clone(self.inner.description(entity)?);
        Ok(Repository::new(Arc::clone(&self.inner), desc))
    }

    /// Waits for every entity's migration, reporting the first failure.
    pub async fn ready(&self) -> Result<()> {
        for desc in self.inner.registry.iter() {
            self.inner.ready(desc.name()).await?;
        }
        Ok(())
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("entities", &self.inner.gates.len())
            .finish_non_exhaustive()
    }
}

fn migration_gate(executor: Arc<dyn Executor>, desc: Arc<EntityDescription>) -> Gate {
    async move { migrate(executor.as_ref(), &desc).await.map_err(Arc::new) }
        .boxed()
        .shared()
}
