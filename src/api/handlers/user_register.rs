use super::{error_response, missing_payload, ApiResponse, UserResponse};
use crate::auth::AuthService;
use axum::{extract::Extension, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UserRegister {
    identifier: Option<String>,
    password: Option<String>,
}

#[utoipa::path(
    post,
    path= "/register",
    request_body = UserRegister,
    responses (
        (status = 201, description = "Registration successful", body = [ApiResponse], content_type = "application/json"),
        (status = 400, description = "Missing or invalid fields, or identifier already taken", body = [ApiResponse]),
        (status = 500, description = "Credential store failure", body = [ApiResponse]),
    ),
    tag= "register"
)]
// axum handler for register
#[instrument(skip_all)]
pub async fn register(
    auth: Extension<AuthService>,
    payload: Option<Json<UserRegister>>,
) -> (StatusCode, Json<ApiResponse>) {
    let user: UserRegister = match payload {
        Some(Json(payload)) => payload,
        None => return missing_payload(),
    };

    let (Some(identifier), Some(password)) = (user.identifier.as_deref(), user.password.as_deref())
    else {
        return missing_payload();
    };

    debug!(identifier, "register attempt");

    match auth.register(identifier, password).await {
        Ok(user) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                "User registered successfully",
                UserResponse::from(user),
            )),
        ),
        Err(error) => error_response(&error),
    }
}
