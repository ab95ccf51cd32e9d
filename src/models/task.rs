use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::error::AppError;

/// A task as stored and as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Store-assigned identifier.
    pub id: i32,
    /// Trimmed, non-empty title.
    pub title: String,
    pub completed: bool,
    /// Email of the user who created the task.
    pub owner: String,
}

/// Payload of `POST /tasks`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct NewTask {
    #[validate(required(message = "Title is required"), custom = "title_present")]
    pub title: Option<String>,
}

impl NewTask {
    /// Validates the payload and returns the trimmed title.
    pub fn into_title(self) -> Result<String, AppError> {
        self.validate()?;
        Ok(self.title.unwrap_or_default().trim().to_string())
    }
}

/// Payload of `PATCH /tasks/{id}`: exactly one of the two fields.
#[derive(Debug, Default, Deserialize, Validate)]
#[validate(schema(function = "exactly_one_field"))]
pub struct TaskPatch {
    pub completed: Option<bool>,
    #[validate(custom = "title_present")]
    pub title: Option<String>,
}

/// A single validated modification of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskChange {
    Completed(bool),
    Title(String),
}

impl TaskPatch {
    pub fn into_change(self) -> Result<TaskChange, AppError> {
        self.validate()?;
        match (self.completed, self.title) {
            (Some(completed), None) => Ok(TaskChange::Completed(completed)),
            (None, Some(title)) => Ok(TaskChange::Title(title.trim().to_string())),
            _ => Err(AppError::Validation(NO_SINGLE_FIELD.into())),
        }
    }
}

const NO_SINGLE_FIELD: &str = "Provide either completed or title";

fn title_present(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("Title is required".into());
        return Err(error);
    }
    Ok(())
}

fn exactly_one_field(patch: &TaskPatch) -> Result<(), ValidationError> {
    if patch.completed.is_some() == patch.title.is_some() {
        let mut error = ValidationError::new("exactly_one");
        error.message = Some(NO_SINGLE_FIELD.into());
        return Err(error);
    }
    Ok(())
}
