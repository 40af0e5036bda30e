use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::documents::Document;
use super::repository::{Repository, StoreError};

/// In-memory collection for dev/test.
///
/// Locks are held for a single call only; nothing spans an `.await`.
#[derive(Debug)]
pub struct InMemoryRepository<D: Document> {
    inner: RwLock<BTreeMap<D::Id, D>>,
}

impl<D: Document> InMemoryRepository<D> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<D::Id, D>>, StoreError> {
        self.inner.read().map_err(|_| StoreError::Poisoned {
            collection: D::COLLECTION,
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<D::Id, D>>, StoreError> {
        self.inner.write().map_err(|_| StoreError::Poisoned {
            collection: D::COLLECTION,
        })
    }
}

impl<D: Document> Default for InMemoryRepository<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl<D: Document> Repository<D> for InMemoryRepository<D> {
    async fn find_by_id(&self, id: D::Id) -> Result<Option<D>, StoreError> {
        Ok(self.read()?.get(&id).cloned())
    }

    async fn find_one(&self, filter: &D::Filter) -> Result<Option<D>, StoreError> {
        Ok(self.read()?.values().find(|d| d.matches(filter)).cloned())
    }

    async fn find(&self, filter: &D::Filter) -> Result<Vec<D>, StoreError> {
        Ok(self
            .read()?
            .values()
            .filter(|d| d.matches(filter))
            .cloned()
            .collect())
    }

    async fn create(&self, doc: D) -> Result<D, StoreError> {
        let mut map = self.write()?;
        let id = doc.id();
        if map.contains_key(&id) {
            return Err(StoreError::DuplicateId {
                collection: D::COLLECTION,
                id: id.to_string(),
            });
        }
        map.insert(id, doc.clone());
        Ok(doc)
    }

    async fn find_by_id_and_update(&self, id: D::Id, doc: D) -> Result<Option<D>, StoreError> {
        let mut map = self.write()?;
        match map.get_mut(&id) {
            Some(slot) => {
                *slot = doc.clone();
                Ok(Some(doc))
            }
            None => Ok(None),
        }
    }

    async fn find_by_id_and_delete(&self, id: D::Id) -> Result<Option<D>, StoreError> {
        Ok(self.write()?.remove(&id))
    }
}
