use actix_web::{get, post, web, HttpResponse, Responder};
use serde_json::json;

use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{LoginInput, SignupInput},
    state::AppState,
};

/// Register a new user
///
/// ## Responses:
/// - `201 Created`: `{id, name, email}`.
/// - `400 Bad Request`: a field is missing or blank.
/// - `409 Conflict`: the email is already registered.
#[post("/signup")]
pub async fn signup(
    state: web::Data<AppState>,
    input: web::Json<SignupInput>,
) -> Result<impl Responder, AppError> {
    let user = state.auth.signup(input.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Login user
///
/// ## Responses:
/// - `200 OK`: `{message, token, user: {id, name, email}}`.
/// - `400 Bad Request`: a field is missing or blank.
/// - `401 Unauthorized`: unknown email or wrong password, indistinguishably.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    input: web::Json<LoginInput>,
) -> Result<impl Responder, AppError> {
    let response = state.auth.login(input.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Logout user
///
/// Always succeeds; the client discards its token.
#[post("/logout")]
pub async fn logout(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(json!({ "message": state.auth.logout() }))
}

/// Profile of the caller.
#[get("/me")]
pub async fn me(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let profile = state.auth.current_user(&user.0).await?;
    Ok(HttpResponse::Ok().json(profile))
}
