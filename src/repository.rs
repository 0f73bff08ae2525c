//! CRUD entry points for one entity.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tether_core::{Result, TetherError, Value};
use tether_postgres::builder::{conjunction, equality, select_all, select_where};
use tether_postgres::{EncodeError, InsertStatement, JoinInsert, values};
use tether_types::{EntityDescription, FieldDescriptor, naming};

use crate::cache::ResolutionCache;
use crate::database::Inner;
use crate::hydrate::hydrate;
use crate::record::Record;

/// Reads and writes records of one entity.
///
/// Every operation first waits for the entity's migration. Reads without an
/// explicit cache get a fresh one scoped to the call; the `*_with` variants
/// share the caller's cache, so records already seen through it are reused.
#[derive(Clone)]
pub struct Repository {
    inner: Arc<Inner>,
    desc: Arc<EntityDescription>,
}

impl Repository {
    pub(crate) fn new(inner: Arc<Inner>, desc: Arc<EntityDescription>) -> Self {
        Self { inner, desc }
    }

    #[inline]
    pub fn entity(&self) -> &str {
        self.desc.name()
    }

    pub fn description(&self) -> &EntityDescription {
        &self.desc
    }

    /// Waits for this entity's migration.
    pub async fn ready(&self) -> Result<()> {
        self.inner.ready(self.entity()).await
    }

    /// Inserts a record and returns it hydrated.
    ///
    /// Scalars are literal-encoded, references store the referenced id and
    /// collections insert one join row per element once the new row exists.
    /// Everything happens in one round trip. When a field is given twice the
    /// last value wins.
    pub async fn create<K>(&self, values: impl IntoIterator<Item = (K, Value)>) -> Result<Arc<Record>>
    where
        K: Into<String>,
    {
        let mut given: HashMap<String, Value> = HashMap::new();
        for (name, value) in values {
            let name = name.into();
            match self.desc.field(&name) {
                None => return Err(self.unknown_field(&name)),
                Some(field) if field.is_reverse() => {
                    return Err(TetherError::ReadOnlyField {
                        entity: self.entity().to_string(),
                        field: name,
                    });
                }
                Some(_) => {
                    given.insert(name, value);
                }
            }
        }

        let mut insert = InsertStatement::new(self.entity());
        for (name, field) in self.desc.fields() {
            let Some(value) = given.get(name) else {
                continue;
            };
            match field {
                FieldDescriptor::Scalar(kind) => {
                    insert = insert.column(name, values::encode_scalar(value, kind));
                }
                FieldDescriptor::Reference { target, .. } => {
                    self.check_target(name, target, value)?;
                    let literal = values::encode_reference(value)
                        .map_err(|e| self.missing_identity(name, e))?;
                    insert = insert.column(name, literal);
                }
                FieldDescriptor::Collection { target, .. } => {
                    for id in self.collection_ids(name, target, value)? {
                        insert = insert.join(JoinInsert {
                            table: naming::join_table(self.entity(), name),
                            owner_column: naming::join_owner_column(self.entity()),
                            target_column: naming::join_target_column(name),
                            target_id: id,
                        });
                    }
                }
                FieldDescriptor::ReverseOf { .. } | FieldDescriptor::ReverseJoinOf { .. } => {}
            }
        }

        let rows = self.inner.fetch(self.entity(), &insert.to_sql()).await?;
        let row = rows.last().ok_or_else(|| {
            TetherError::ExecutionError(format!("insert into `{}` returned no row", self.entity()))
        })?;
        hydrate(&self.inner, &self.desc, row, &ResolutionCache::new(), &None)
    }

    /// The record with `id`, if it exists.
    pub async fn get(&self, id: i64) -> Result<Option<Arc<Record>>> {
        self.get_with(id, &ResolutionCache::new()).await
    }

    pub async fn get_with(&self, id: i64, cache: &ResolutionCache) -> Result<Option<Arc<Record>>> {
        self.inner.ready(self.entity()).await?;
        self.inner.get(self.entity(), id, cache).await
    }

    /// Records whose fields equal every given value. `NULL` matches with
    /// `IS NULL`. An empty set of equalities matches every record.
    pub async fn find<K>(&self, equalities: impl IntoIterator<Item = (K, Value)>) -> Result<Vec<Arc<Record>>>
    where
        K: AsRef<str>,
    {
        self.find_with(equalities, &ResolutionCache::new()).await
    }

    pub async fn find_with<K>(
        &self,
        equalities: impl IntoIterator<Item = (K, Value)>,
        cache: &ResolutionCache,
    ) -> Result<Vec<Arc<Record>>>
    where
        K: AsRef<str>,
    {
        let mut predicates = Vec::new();
        for (name, value) in equalities {
            let name = name.as_ref();
            let literal = if name == "id" {
                values::literal(&value)
            } else {
                let field = self
                    .desc
                    .field(name)
                    .ok_or_else(|| self.unknown_field(name))?;
                match field {
                    FieldDescriptor::Scalar(kind) => values::encode_scalar(&value, kind),
                    FieldDescriptor::Reference { .. } => values::encode_reference(&value)
                        .map_err(|e| self.missing_identity(name, e))?,
                    _ => {
                        return Err(TetherError::RelationKind {
                            entity: self.entity().to_string(),
                            field: name.to_string(),
                            expected: "stored",
                        });
                    }
                }
            };
            predicates.push((name.to_string(), literal));
        }
        let predicate = conjunction(
            predicates
                .iter()
                .map(|(name, literal)| equality(name, literal.clone())),
        )
        .sql();
        self.where_with(&predicate, cache).await
    }

    /// Records matching a raw SQL predicate.
    ///
    /// The predicate is spliced into the statement verbatim and must come
    /// from trusted code.
    pub async fn r#where(&self, predicate: &str) -> Result<Vec<Arc<Record>>> {
        self.where_with(predicate, &ResolutionCache::new()).await
    }

    pub async fn where_with(&self, predicate: &str, cache: &ResolutionCache) -> Result<Vec<Arc<Record>>> {
        let sql = select_where(self.entity(), predicate).sql();
        self.inner.load(self.entity(), &sql, cache, None).await
    }

    /// Every record of the entity.
    pub async fn all(&self) -> Result<Vec<Arc<Record>>> {
        self.all_with(&ResolutionCache::new()).await
    }

    pub async fn all_with(&self, cache: &ResolutionCache) -> Result<Vec<Arc<Record>>> {
        let sql = select_all(self.entity()).sql();
        self.inner.load(self.entity(), &sql, cache, None).await
    }

    fn unknown_field(&self, name: &str) -> TetherError {
        TetherError::UnknownField {
            entity: self.entity().to_string(),
            field: name.to_string(),
        }
    }

    fn missing_identity(&self, name: &str, error: EncodeError) -> TetherError {
        let found = match error {
            EncodeError::MissingIdentity(kind) => kind.to_string(),
            EncodeError::NotALiteral => error.to_string(),
        };
        TetherError::MissingIdentity {
            entity: self.entity().to_string(),
            field: name.to_string(),
            found,
        }
    }

    /// References must point at a record of the declared target entity.
    fn check_target(&self, name: &str, target: &str, value: &Value) -> Result<()> {
        match value {
            Value::Ref(key) if &*key.entity != target => Err(TetherError::MissingIdentity {
                entity: self.entity().to_string(),
                field: name.to_string(),
                found: format!("a `{}` record", key.entity),
            }),
            _ => Ok(()),
        }
    }

    fn collection_ids(&self, name: &str, target: &str, value: &Value) -> Result<Vec<i64>> {
        let items = match value {
            Value::Null => return Ok(Vec::new()),
            Value::List(items) => items.as_slice(),
            single => std::slice::from_ref(single),
        };
        items
            .iter()
            .map(|item| {
                self.check_target(name, target, item)?;
                item.as_ref_key()
                    .map(|key| key.id)
                    .ok_or_else(|| TetherError::MissingIdentity {
                        entity: self.entity().to_string(),
                        field: name.to_string(),
                        found: item.kind_name().to_string(),
                    })
            })
            .collect()
    }
}

impl fmt::Debug for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("entity", &self.entity())
            .finish_non_exhaustive()
    }
}
