use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{NewTask, TaskPatch},
    state::AppState,
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};

// `AuthenticatedUser` is the first argument of every handler here, so a request without a
// valid token is rejected before the body is read or the store is touched.

/// Lists the caller's tasks, newest first.
///
/// ## Responses:
/// - `200 OK`: JSON array of tasks.
/// - `403 Forbidden`: missing or invalid token.
#[get("")]
pub async fn get_tasks(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.list(user.email()).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task owned by the caller.
///
/// ## Request Body:
/// - `title`: required, trimmed, must not be blank.
///
/// ## Responses:
/// - `201 Created`: the stored task.
/// - `400 Bad Request`: blank or missing title.
/// - `403 Forbidden`: missing or invalid token.
#[post("")]
pub async fn create_task(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    input: web::Json<NewTask>,
) -> Result<impl Responder, AppError> {
    let task = state.tasks.create(user.email(), input.into_inner()).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Toggles completion or renames one of the caller's tasks.
///
/// ## Request Body:
/// Exactly one of `{"completed": bool}` or `{"title": string}`.
///
/// ## Responses:
/// - `200 OK`: the updated task.
/// - `400 Bad Request`: neither or both fields, or a blank title.
/// - `403 Forbidden`: missing or invalid token.
/// - `404 Not Found`: no such task among the caller's tasks.
#[patch("/{id}")]
pub async fn update_task(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    task_id: web::Path<i32>,
    patch: web::Json<TaskPatch>,
) -> Result<impl Responder, AppError> {
    let task = state
        .tasks
        .update(user.email(), task_id.into_inner(), patch.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes one of the caller's tasks.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Task deleted", "deleted": task}`.
/// - `403 Forbidden`: missing or invalid token.
/// - `404 Not Found`: no such task among the caller's tasks.
#[delete("/{id}")]
pub async fn delete_task(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    task_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let deleted = state
        .tasks
        .delete(user.email(), task_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(deleted))
}
