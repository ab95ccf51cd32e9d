#![allow(dead_code)]

use actix_web::{test, web};
use serde_json::json;
use tazky::auth::AuthResponse;
use tazky::state::AppState;
use tazky::store::MemoryStore;

pub const SECRET: &str = "integration-test-secret";

/// Fresh state over an in-memory store, with the cheapest bcrypt cost.
pub fn state() -> (web::Data<AppState>, MemoryStore) {
    let store = MemoryStore::new();
    let state = AppState::with_memory_store(store.clone(), SECRET, chrono::Duration::hours(1), 4);
    (web::Data::new(state), store)
}

/// Signs up and logs in through the HTTP surface, returning the login response.
pub async fn register_and_login(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
    >,
    name: &str,
    email: &str,
    password: &str,
) -> Result<AuthResponse, String> {
    let req = test::TestRequest::post()
        .uri("/signup")
        .set_json(json!({ "name": name, "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    if !status.is_success() {
        return Err(format!(
            "Failed to register user. Status: {}. Body: {}",
            status,
            String::from_utf8_lossy(&body)
        ));
    }

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    if !status.is_success() {
        return Err(format!(
            "Failed to log in. Status: {}. Body: {}",
            status,
            String::from_utf8_lossy(&body)
        ));
    }
    serde_json::from_slice(&body).map_err(|e| format!("Failed to parse login response: {}", e))
}

pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (
        actix_web::http::header::AUTHORIZATION,
        format!("Bearer {}", token),
    )
}
