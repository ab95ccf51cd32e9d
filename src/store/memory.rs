use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StoreError, TaskStore, UserStore};
use crate::models::{Task, TaskChange, User, UserRecord};

/// In-process store for tests and database-less local runs.
///
/// Ids are assigned sequentially from 1, as a `SERIAL` column would.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    users: Vec<UserRecord>,
    tasks: BTreeMap<i32, Task>,
    last_user_id: i32,
    last_task_id: i32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tasks across all owners.
    pub async fn task_count(&self) -> usize {
        self.inner.read().await.tasks.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|u| u.email == email) {
            return Err(StoreError::Conflict("User already exists".into()));
        }
        inner.last_user_id += 1;
        let record = UserRecord {
            id: inner.last_user_id,
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        };
        inner.users.push(record.clone());
        Ok(record.into())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list_by_owner(&self, owner: &str) -> Result<Vec<Task>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .tasks
            .values()
            .rev()
            .filter(|t| t.owner == owner)
            .cloned()
            .collect())
    }

    async fn insert(&self, owner: &str, title: &str) -> Result<Task, StoreError> {
        let mut inner = self.inner.write().await;
        inner.last_task_id += 1;
        let task = Task {
            id: inner.last_task_id,
            title: title.to_string(),
            completed: false,
            owner: owner.to_string(),
        };
        inner.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update(
        &self,
        id: i32,
        owner: &str,
        change: TaskChange,
    ) -> Result<Option<Task>, StoreError> {
        let mut inner = self.inner.write().await;
        let task = match inner.tasks.get_mut(&id) {
            Some(task) if task.owner == owner => task,
            _ => return Ok(None),
        };
        match change {
            TaskChange::Completed(completed) => task.completed = completed,
            TaskChange::Title(title) => task.title = title,
        }
        Ok(Some(task.clone()))
    }

    async fn delete(&self, id: i32, owner: &str) -> Result<Option<Task>, StoreError> {
        let mut inner = self.inner.write().await;
        let owned = inner.tasks.get(&id).is_some_and(|t| t.owner == owner);
        if !owned {
            return Ok(None);
        }
        Ok(inner.tasks.remove(&id))
    }
}
