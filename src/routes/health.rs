use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

use crate::state::AppState;

#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("API is running securely with JWT Authentication!")
}

/// Health check endpoint
///
/// Reports whether the store answers a ping. `503` when it does not.
#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> impl Responder {
    if state.tasks.store_is_up().await {
        HttpResponse::Ok().json(json!({
            "status": "ok",
            "database": "up",
            "timestamp": Utc::now()
        }))
    } else {
        HttpResponse::ServiceUnavailable().json(json!({
            "status": "degraded",
            "database": "down",
            "timestamp": Utc::now()
        }))
    }
}
