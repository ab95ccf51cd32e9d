pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::{error, web};

use crate::error::AppError;

/// Registers every route plus the JSON extractor configuration.
///
/// The caller registers `web::Data<AppState>` on the `App`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(health::index)
        .service(health::health)
        .service(auth::signup)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::me)
        .service(
            web::scope("/tasks")
                .service(tasks::get_tasks)
                .service(tasks::create_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        );
}

/// Body extraction failures answer with the same `{message}` shape as every other error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = match &err {
            error::JsonPayloadError::ContentType => "Expected a JSON body",
            _ => "Malformed JSON body",
        };
        log::debug!("rejected request body: {}", err);
        AppError::Validation(message.into()).into()
    })
}

/// A task id that does not parse as an id cannot name one of the caller's tasks.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        log::debug!("rejected path: {}", err);
        AppError::NotFound("Task not found".into()).into()
    })
}
