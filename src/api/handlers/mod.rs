pub mod health;
pub use self::health::health;

pub mod user_register;
pub use self::user_register::register;

pub mod user_login;
pub use self::user_login::login;

// common response shapes for the handlers
use crate::auth::{AuthError, PublicUser};
use axum::{http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

/// Public view of a user record; the password hash is never exposed.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UserResponse {
    pub id: i64,
    pub identifier: String,
    pub created_at: String,
}

impl From<PublicUser> for UserResponse {
    fn from(user: PublicUser) -> Self {
        Self {
            id: user.id,
            identifier: user.identifier,
            created_at: user.created_at,
        }
    }
}

/// Uniform response envelope: `{status, message}` plus the user on success.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
}

impl ApiResponse {
    #[must_use]
    pub fn success(message: impl Into<String>, user: UserResponse) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            user: Some(user),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            user: None,
        }
    }
}

/// 400 response for an absent or unparseable payload, or missing JSON keys.
pub(crate) fn missing_payload() -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::error("Missing required fields")),
    )
}

/// Convert an auth error into the uniform envelope. Store failures are logged
/// in full and reported with a sanitized message.
pub(crate) fn error_response(error: &AuthError) -> (StatusCode, Json<ApiResponse>) {
    let status = match error {
        AuthError::MissingCredentials | AuthError::PasswordTooShort | AuthError::UserExists => {
            StatusCode::BAD_REQUEST
        }
        AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthError::Store(source) => {
            error!("Credential store failure: {:?}", source);

            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Internal server error")),
            );
        }
    };

    (status, Json(ApiResponse::error(error.to_string())))
}
