use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, Error as ActixError, FromRequest, HttpRequest};
use futures::future::{ready, Ready};

use crate::auth::Claims;
use crate::error::AppError;
use crate::state::AppState;

/// The verified caller of a protected route.
///
/// Extraction reads `Authorization: Bearer <token>` and verifies it against the
/// application's keys. A handler that takes this extractor as its first argument is
/// never entered, and never reaches a store, when the token is missing or invalid.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl AuthenticatedUser {
    pub fn email(&self) -> &str {
        &self.0.email
    }
}

/// Returns the raw token of a `Bearer` authorization header, if any.
pub fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).map_err(ActixError::from))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("AppState is not registered".into()))?;
    let token =
        bearer_token(req).ok_or_else(|| AppError::Forbidden("No token provided".into()))?;
    state.auth.verify(token).map(AuthenticatedUser)
}
