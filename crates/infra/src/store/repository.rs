use std::sync::Arc;

use thiserror::Error;

use super::documents::Document;

/// Persistence failure.
///
/// These are infrastructure errors, as opposed to lookups that simply find
/// nothing (`Ok(None)`).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{collection}: lock poisoned")]
    Poisoned { collection: &'static str },

    #[error("{collection}: document {id} already exists")]
    DuplicateId { collection: &'static str, id: String },

    #[error("{collection}: backend unavailable: {reason}")]
    Unavailable {
        collection: &'static str,
        reason: String,
    },
}

/// Async find/create/update/delete contract over one collection.
///
/// Each call is independent: an existence check followed by a mutation is not
/// atomic.
#[async_trait::async_trait]
pub trait Repository<D: Document>: Send + Sync {
    async fn find_by_id(&self, id: D::Id) -> Result<Option<D>, StoreError>;

    /// First document matching the filter, in id order.
    async fn find_one(&self, filter: &D::Filter) -> Result<Option<D>, StoreError>;

    /// All documents matching the filter, in id (creation) order.
    async fn find(&self, filter: &D::Filter) -> Result<Vec<D>, StoreError>;

    async fn create(&self, doc: D) -> Result<D, StoreError>;

    /// Replace the stored document. `None` if nothing is stored under `id`.
    async fn find_by_id_and_update(&self, id: D::Id, doc: D) -> Result<Option<D>, StoreError>;

    /// Remove and return the stored document, if any.
    async fn find_by_id_and_delete(&self, id: D::Id) -> Result<Option<D>, StoreError>;
}

#[async_trait::async_trait]
impl<D, S> Repository<D> for Arc<S>
where
    D: Document,
    S: Repository<D> + ?Sized,
{
    async fn find_by_id(&self, id: D::Id) -> Result<Option<D>, StoreError> {
        (**self).find_by_id(id).await
    }

    async fn find_one(&self, filter: &D::Filter) -> Result<Option<D>, StoreError> {
        (**self).find_one(filter).await
    }

    async fn find(&self, filter: &D::Filter) -> Result<Vec<D>, StoreError> {
        (**self).find(filter).await
    }

    async fn create(&self, doc: D) -> Result<D, StoreError> {
        (**self).create(doc).await
    }

    async fn find_by_id_and_update(&self, id: D::Id, doc: D) -> Result<Option<D>, StoreError> {
        (**self).find_by_id_and_update(id, doc).await
    }

    async fn find_by_id_and_delete(&self, id: D::Id) -> Result<Option<D>, StoreError> {
        (**self).find_by_id_and_delete(id).await
    }
}
