//! Storage engine contract: typed CRUD primitives with constraint enforcement.
//!
//! Uniqueness and existence checks happen inside each engine as one atomic
//! operation per call (a single SQL statement, or a single lock acquisition for
//! the in-memory engine), so concurrent writers cannot race a separate
//! pre-check.

mod memory;
mod postgres;

use crate::entity::Entity;
use crate::error::AppError;
use async_trait::async_trait;

pub use memory::MemStore;
pub use postgres::{ensure_tables, PgStore};

#[async_trait]
pub trait Store<T: Entity>: Send + Sync {
    /// Assign an identifier and persist. Conflict when a uniqueness constraint
    /// is violated.
    async fn create(&self, record: T) -> Result<T, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<T, AppError>;

    /// All records in stable id order. Empty is a valid outcome.
    async fn find_all(&self) -> Result<Vec<T>, AppError>;

    /// Lookup keyed on a non-identifier field (e.g. account email).
    async fn find_by_field(&self, field: T::Field, value: &str) -> Result<T, AppError>;

    /// Atomic merge-and-write: fields absent from the change set keep their
    /// stored values. Re-checks uniqueness when a unique field changes.
    async fn update(&self, id: i64, changes: T::Changes) -> Result<T, AppError>;

    /// NotFound when the id is absent, including on repeated deletes.
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}
