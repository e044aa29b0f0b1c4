//! Generic resource controller: one instance per entity kind, built over an
//! injected storage engine.

use crate::entity::Entity;
use crate::error::AppError;
use crate::service::Validate;
use crate::store::Store;
use std::sync::Arc;

pub struct Resource<T: Entity> {
    store: Arc<dyn Store<T>>,
}

impl<T: Entity> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Resource {
            store: self.store.clone(),
        }
    }
}

impl<T: Entity> Resource<T> {
    pub fn new(store: Arc<dyn Store<T>>) -> Self {
        Resource { store }
    }

    /// Validate, then create. The store assigns the identifier and enforces
    /// uniqueness; conflicts and storage failures propagate typed.
    pub async fn create(&self, new: T::New) -> Result<T, AppError> {
        new.validate()?;
        let record = T::new_record(new)?;
        self.store.create(record).await
    }

    pub async fn get(&self, id: i64) -> Result<T, AppError> {
        self.store.find_by_id(id).await
    }

    pub async fn list(&self) -> Result<Vec<T>, AppError> {
        self.store.find_all().await
    }

    /// Partial-merge update: fields absent from the patch keep their stored
    /// values. An unknown id reports NotFound before the patch is validated.
    pub async fn update(&self, id: i64, patch: T::Patch) -> Result<T, AppError> {
        self.store.find_by_id(id).await?;
        patch.validate()?;
        let changes = T::changes(patch)?;
        self.store.update(id, changes).await
    }

    /// Delete is terminal; repeating it reports NotFound rather than silently
    /// succeeding.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.store.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{CatalogItem, ItemPatch, NewItem};
    use crate::store::MemStore;

    fn items() -> Resource<CatalogItem> {
        Resource::new(Arc::new(MemStore::new()))
    }

    #[tokio::test]
    async fn create_then_get_returns_equal_record() {
        let items = items();
        let created = items
            .create(NewItem {
                name: "Widget".into(),
                price: 9.99,
            })
            .await
            .unwrap();
        assert_eq!(created.id, 1);
        let fetched = items.get(created.id).await.unwrap();
        assert_eq!(fetched.name, "Widget");
        assert_eq!(fetched.price, 9.99);
    }

    #[tokio::test]
    async fn invalid_update_leaves_record_unchanged() {
        let items = items();
        let created = items
            .create(NewItem {
                name: "Widget".into(),
                price: 9.99,
            })
            .await
            .unwrap();
        let err = items
            .update(
                created.id,
                ItemPatch {
                    name: None,
                    price: Some(-1.0),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(items.get(created.id).await.unwrap().price, 9.99);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found_even_with_bad_patch() {
        let err = items()
            .update(
                42,
                ItemPatch {
                    name: None,
                    price: Some(-1.0),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let items = items();
        let created = items
            .create(NewItem {
                name: "Widget".into(),
                price: 1.0,
            })
            .await
            .unwrap();
        items.delete(created.id).await.unwrap();
        assert!(matches!(items.get(created.id).await, Err(AppError::NotFound(_))));
        assert!(matches!(items.delete(created.id).await, Err(AppError::NotFound(_))));
    }
}
