//! Deferred relation handles.
//!
//! Handles are not memoized: every `resolve` consults the resolution cache
//! (and, for sequences, storage) again. Identity comes from the cache, which
//! is shared by every handle hydrated under the same top-level call.

use std::fmt;
use std::sync::{Arc, Weak};

use tether_core::Result;

use crate::cache::ResolutionCache;
use crate::database::Inner;
use crate::record::Record;

pub(crate) enum OneState {
    Null,
    Pending(i64),
    Preset(Arc<Record>),
}

/// A reference field: zero or one record of the target entity.
pub struct One {
    pub(crate) target: Arc<str>,
    pub(crate) state: OneState,
    pub(crate) inner: Arc<Inner>,
    pub(crate) cache: ResolutionCache,
}

impl One {
    /// Entity the reference points at
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Stored id of the referenced record, without resolving it.
    pub fn id(&self) -> Option<i64> {
        match &self.state {
            OneState::Null => None,
            OneState::Pending(id) => Some(*id),
            OneState::Preset(record) => Some(record.id()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.state, OneState::Null)
    }

    /// The referenced record.
    ///
    /// A record already in the cache is returned without a round trip. A
    /// dangling id resolves to `None`.
    pub async fn resolve(&self) -> Result<Option<Arc<Record>>> {
        match &self.state {
            OneState::Null => Ok(None),
            OneState::Preset(record) => Ok(Some(Arc::clone(record))),
            OneState::Pending(id) => self.inner.get(&self.target, *id, &self.cache).await,
        }
    }
}

impl fmt::Debug for One {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            OneState::Null => write!(f, "One({} NULL)", self.target),
            OneState::Pending(id) => write!(f, "One({}#{id})", self.target),
            OneState::Preset(record) => write!(f, "One({})", record.key()),
        }
    }
}

/// A collection or reverse field: an ordered sequence of target records.
pub struct Many {
    pub(crate) target: Arc<str>,
    pub(crate) sql: String,
    /// Reference field on each loaded record that points back at the owner
    pub(crate) back_reference: Option<(String, Weak<Record>)>,
    pub(crate) inner: Arc<Inner>,
    pub(crate) cache: ResolutionCache,
}

impl Many {
    /// Entity the loaded records belong to
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The query run by [`Many::resolve`]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Loads the related records in id order.
    ///
    /// Collections return one record per join row, so a record linked twice
    /// appears twice (as the same `Arc`).
    pub async fn resolve(&self) -> Result<Vec<Arc<Record>>> {
        let owner = self
            .back_reference
            .as_ref()
            .and_then(|(field, owner)| Some((field.as_str(), owner.upgrade()?)));
        self.inner
            .load(&self.target, &self.sql, &self.cache, owner)
            .await
    }
}

impl fmt::Debug for Many {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Many({})", self.target)
    }
}
