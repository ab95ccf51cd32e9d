use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// Public view of an account. This is the only user shape that leaves the service layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// A stored account including its bcrypt hash.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
        }
    }
}

/// Payload of `POST /signup`.
///
/// Fields are optional at the serde level so that an absent field is reported
/// with the same 400 as an empty one.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct SignupInput {
    #[validate(required(message = "All fields are required"), custom = "present")]
    pub name: Option<String>,
    #[validate(required(message = "All fields are required"), custom = "present")]
    pub email: Option<String>,
    #[validate(
        required(message = "All fields are required"),
        length(min = 1, message = "All fields are required")
    )]
    pub password: Option<String>,
}

/// Payload of `POST /login`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(required(message = "All fields are required"), custom = "present")]
    pub email: Option<String>,
    #[validate(
        required(message = "All fields are required"),
        length(min = 1, message = "All fields are required")
    )]
    pub password: Option<String>,
}

fn present(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("All fields are required".into());
        return Err(error);
    }
    Ok(())
}
