//! Persistence seams for users and tasks.
//!
//! Services only talk to the `UserStore` and `TaskStore` traits, so the
//! PostgreSQL-backed `PgStore` can be swapped for `MemoryStore` in tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::models::{Task, TaskChange, User, UserRecord};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Failures surfaced by a store implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique key (the user email) already exists.
    #[error("conflict: {0}")]
    Conflict(String),
    /// The backend could not be reached or did not answer in time. Retryable.
    #[error("unavailable: {0}")]
    Unavailable(String),
    #[error("internal: {0}")]
    Internal(String),
}

/// Credential records. Owns the password hash; nothing above the service layer sees it.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Persists a new user. Fails with `StoreError::Conflict` if the email is taken.
    async fn insert(&self, name: &str, email: &str, password_hash: &str)
        -> Result<User, StoreError>;
}

/// Task records, always addressed through the owner's email.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All tasks of `owner`, newest (highest id) first.
    async fn list_by_owner(&self, owner: &str) -> Result<Vec<Task>, StoreError>;

    /// Inserts an incomplete task and returns the stored row.
    async fn insert(&self, owner: &str, title: &str) -> Result<Task, StoreError>;

    /// Applies `change` to task `id` if it belongs to `owner`.
    async fn update(&self, id: i32, owner: &str, change: TaskChange)
        -> Result<Option<Task>, StoreError>;

    /// Removes task `id` if it belongs to `owner`, returning the removed row.
    async fn delete(&self, id: i32, owner: &str) -> Result<Option<Task>, StoreError>;

    /// Cheap liveness probe used by the health endpoint.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
