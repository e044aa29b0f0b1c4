//! In-memory storage engine. Used by the test suite and anywhere a database is
//! not worth standing up; semantics match the PostgreSQL engine, including
//! atomic check-and-write (everything happens under one lock acquisition).

use crate::entity::Entity;
use crate::error::AppError;
use crate::store::Store;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

struct Inner<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

pub struct MemStore<T: Entity> {
    inner: RwLock<Inner<T>>,
}

impl<T: Entity> MemStore<T> {
    pub fn new() -> Self {
        MemStore {
            inner: RwLock::new(Inner {
                rows: BTreeMap::new(),
                next_id: 0,
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner<T>>, AppError> {
        self.inner
            .read()
            .map_err(|_| AppError::Internal("store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner<T>>, AppError> {
        self.inner
            .write()
            .map_err(|_| AppError::Internal("store lock poisoned".into()))
    }

    fn not_found(id: i64) -> AppError {
        AppError::NotFound(format!("{} {}", T::KIND, id))
    }

    fn conflict(field: T::Field) -> AppError {
        AppError::Conflict(format!("duplicate {}", T::field_name(field)))
    }
}

impl<T: Entity> Default for MemStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> Store<T> for MemStore<T> {
    async fn create(&self, mut record: T) -> Result<T, AppError> {
        let mut inner = self.write()?;
        if let Some(field) = T::unique_field() {
            let taken = inner
                .rows
                .values()
                .any(|row| row.field(field) == record.field(field));
            if taken {
                return Err(Self::conflict(field));
            }
        }
        inner.next_id += 1;
        record.set_id(inner.next_id);
        inner.rows.insert(record.id(), record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: i64) -> Result<T, AppError> {
        self.read()?
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn find_all(&self) -> Result<Vec<T>, AppError> {
        Ok(self.read()?.rows.values().cloned().collect())
    }

    async fn find_by_field(&self, field: T::Field, value: &str) -> Result<T, AppError> {
        self.read()?
            .rows
            .values()
            .find(|row| row.field(field) == value)
            .cloned()
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "{} with {} '{}'",
                    T::KIND,
                    T::field_name(field),
                    value
                ))
            })
    }

    async fn update(&self, id: i64, changes: T::Changes) -> Result<T, AppError> {
        let mut inner = self.write()?;
        let mut merged = inner.rows.get(&id).cloned().ok_or_else(|| Self::not_found(id))?;
        merged.apply(&changes);
        if let Some(field) = T::unique_field() {
            let taken = inner
                .rows
                .values()
                .any(|row| row.id() != id && row.field(field) == merged.field(field));
            if taken {
                return Err(Self::conflict(field));
            }
        }
        inner.rows.insert(id, merged.clone());
        Ok(merged)
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.write()?
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Account, AccountChanges, AccountField};
    use std::sync::Arc;

    fn record(handle: &str, email: &str) -> Account {
        Account {
            id: 0,
            handle: handle.into(),
            password_hash: "$argon2id$stub".into(),
            display_name: String::new(),
            email: email.into(),
        }
    }

    #[tokio::test]
    async fn ids_are_assigned_in_order() {
        let store = MemStore::new();
        let a = store.create(record("a", "a@x.io")).await.unwrap();
        let b = store.create(record("b", "b@x.io")).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        let all = store.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].id < all[1].id);
    }

    #[tokio::test]
    async fn duplicate_handle_leaves_exactly_one_record() {
        let store = MemStore::new();
        store.create(record("ana", "one@x.io")).await.unwrap();
        let err = store.create(record("ana", "two@x.io")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_to_taken_handle_conflicts() {
        let store = MemStore::new();
        store.create(record("ana", "one@x.io")).await.unwrap();
        let other = store.create(record("bob", "two@x.io")).await.unwrap();
        let err = store
            .update(
                other.id,
                AccountChanges {
                    handle: Some("ana".into()),
                    password_hash: None,
                    display_name: None,
                    email: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        // keeping your own handle is not a conflict
        store
            .update(
                other.id,
                AccountChanges {
                    handle: Some("bob".into()),
                    password_hash: None,
                    display_name: None,
                    email: Some("new@x.io".into()),
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn find_by_field_discriminates_absence() {
        let store = MemStore::new();
        store.create(record("ana", "ana@x.io")).await.unwrap();
        let found = store
            .find_by_field(AccountField::Email, "ana@x.io")
            .await
            .unwrap();
        assert_eq!(found.handle, "ana");
        let missing = store.find_by_field(AccountField::Email, "ghost@x.io").await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_creates_with_one_handle_admit_exactly_one() {
        let store: Arc<MemStore<Account>> = Arc::new(MemStore::new());
        let mut tasks = tokio::task::JoinSet::new();
        for i in 0..16 {
            let store = store.clone();
            tasks.spawn(async move {
                store.create(record("ana", &format!("{}@x.io", i))).await
            });
        }
        let mut created = 0;
        let mut conflicts = 0;
        while let Some(result) = tasks.join_next().await {
            match result.unwrap() {
                Ok(_) => created += 1,
                Err(AppError::Conflict(_)) => conflicts += 1,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }
        assert_eq!((created, conflicts), (1, 15));
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }
}
