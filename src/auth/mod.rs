//! Account lifecycle: signup, login, token verification and logout.

pub mod extractors;
pub mod password;
pub mod token;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::models::{LoginInput, SignupInput, User};
use crate::store::UserStore;

pub use extractors::AuthenticatedUser;
pub use password::{hash_password, verify_password, DEFAULT_BCRYPT_COST};
pub use token::{Claims, TokenKeys};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Response body of a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    /// The JWT to present as `Authorization: Bearer <token>`.
    pub token: String,
    pub user: User,
}

/// Issues and checks credentials. Owns the signing keys; users live in the injected store.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    keys: TokenKeys,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, keys: TokenKeys, bcrypt_cost: u32) -> Self {
        Self {
            users,
            keys,
            bcrypt_cost,
        }
    }

    pub fn keys(&self) -> &TokenKeys {
        &self.keys
    }

    /// Creates an account. The existence check and the insert are two statements, so two
    /// concurrent signups for one email can both pass the check; the unique index then
    /// rejects the loser, which also surfaces as a conflict.
    pub async fn signup(&self, input: SignupInput) -> Result<User, AppError> {
        input.validate()?;
        let (name, email, password) = (
            input.name.unwrap_or_default(),
            input.email.unwrap_or_default(),
            input.password.unwrap_or_default(),
        );

        if self.users.find_by_email(&email).await?.is_some() {
            log::info!("signup rejected, email already registered");
            return Err(AppError::Conflict("User already exists".into()));
        }

        let password_hash = password::hash_password_blocking(password, self.bcrypt_cost).await?;
        let user = self.users.insert(&name, &email, &password_hash).await?;
        log::info!("user {} signed up", user.id);
        Ok(user)
    }

    /// Checks credentials and issues a session token.
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, input: LoginInput) -> Result<AuthResponse, AppError> {
        input.validate()?;
        let (email, password) = (
            input.email.unwrap_or_default(),
            input.password.unwrap_or_default(),
        );

        let record = match self.users.find_by_email(&email).await? {
            Some(record) => record,
            None => {
                log::debug!("login failed: unknown email");
                return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
            }
        };

        if !password::verify_password_blocking(password, record.password_hash.clone()).await? {
            log::debug!("login failed: password mismatch for user {}", record.id);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }

        let token = self.keys.issue(record.id, &record.email)?;
        log::info!("user {} logged in", record.id);
        Ok(AuthResponse {
            message: "Login successful".into(),
            token,
            user: record.into(),
        })
    }

    /// Tokens are not tracked server-side, so logging out only tells the client to drop
    /// its token. A token issued earlier stays valid until it expires.
    pub fn logout(&self) -> &'static str {
        "Logged out successfully"
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        self.keys.verify(token)
    }

    /// Loads the profile of the verified caller.
    pub async fn current_user(&self, claims: &Claims) -> Result<User, AppError> {
        self.users
            .find_by_email(&claims.email)
            .await?
            .map(User::from)
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }
}
