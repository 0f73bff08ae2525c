//! Identity map for one resolution graph.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tether_core::Result;

use crate::record::Record;

type Entries = HashMap<Arc<str>, HashMap<i64, Weak<Record>>>;

/// Maps `(entity, id)` to the record hydrated for it.
///
/// A cache is created for every top-level repository call unless one is
/// passed explicitly, and is shared by every relation handle hydrated under
/// that call. Within one cache each stored row is hydrated at most once while
/// its record is alive, so walking a cycle of relations comes back to the
/// same in-memory record.
///
/// Entries are weak: the cache never keeps a record alive on its own. Cloning
/// a cache shares it.
#[derive(Clone, Default)]
pub struct ResolutionCache {
    entries: Arc<Mutex<Entries>>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The live record registered for `(entity, id)`, if any.
    pub fn lookup(&self, entity: &str, id: i64) -> Option<Arc<Record>> {
        self.lock().get(entity)?.get(&id)?.upgrade()
    }

    /// Number of live records in the cache.
    pub fn len(&self) -> usize {
        self.lock()
            .values()
            .flat_map(HashMap::values)
            .filter(|record| record.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether two handles share the same underlying map.
    pub fn same_as(&self, other: &ResolutionCache) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }

    /// Returns the registered record or registers the one built by `build`.
    ///
    /// The lookup and the registration happen under one lock acquisition, so
    /// concurrent hydrations of the same row agree on a single record. `build`
    /// must not touch the cache.
    pub(crate) fn get_or_try_insert_with<F>(
        &self,
        entity: &str,
        id: i64,
        build: F,
    ) -> Result<Arc<Record>>
    where
        F: FnOnce() -> Result<Arc<Record>>,
    {
        let mut entries = self.lock();
        if let Some(record) = entries
            .get(entity)
            .and_then(|ids| ids.get(&id))
            .and_then(Weak::upgrade)
        {
            return Ok(record);
        }
        let record = build()?;
        entries
            .entry(Arc::from(entity))
            .or_default()
            .insert(id, Arc::downgrade(&record));
        Ok(record)
    }
}

impl fmt::Debug for ResolutionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionCache")
            .field("live", &self.len())
            .finish()
    }
}
