//! Owner-scoped task operations.
//!
//! Every method takes the caller's verified email. A task belonging to someone else is
//! reported exactly like a task that does not exist.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{NewTask, Task, TaskPatch};
use crate::store::TaskStore;

/// Response body of a successful delete.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedTask {
    pub message: String,
    pub deleted: Task,
}

#[derive(Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskStore>) -> Self {
        Self { tasks }
    }

    pub async fn list(&self, owner: &str) -> Result<Vec<Task>, AppError> {
        Ok(self.tasks.list_by_owner(owner).await?)
    }

    pub async fn create(&self, owner: &str, input: NewTask) -> Result<Task, AppError> {
        let title = input.into_title()?;
        let task = self.tasks.insert(owner, &title).await?;
        log::debug!("task {} created", task.id);
        Ok(task)
    }

    pub async fn update(&self, owner: &str, id: i32, patch: TaskPatch) -> Result<Task, AppError> {
        let change = patch.into_change()?;
        let task = self
            .tasks
            .update(id, owner, change)
            .await?
            .ok_or_else(not_found)?;
        log::debug!("task {} updated", task.id);
        Ok(task)
    }

    pub async fn delete(&self, owner: &str, id: i32) -> Result<DeletedTask, AppError> {
        let task = self.tasks.delete(id, owner).await?.ok_or_else(not_found)?;
        log::debug!("task {} deleted", task.id);
        Ok(DeletedTask {
            message: "Task deleted".into(),
            deleted: task,
        })
    }

    /// Probes the backing store.
    pub async fn store_is_up(&self) -> bool {
        match self.tasks.ping().await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("store ping failed: {}", e);
                false
            }
        }
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}
