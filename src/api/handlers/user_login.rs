use super::{error_response, missing_payload, ApiResponse, UserResponse};
use crate::auth::AuthService;
use axum::{extract::Extension, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UserLogin {
    identifier: Option<String>,
    password: Option<String>,
}

#[utoipa::path(
    post,
    path= "/login",
    request_body = UserLogin,
    responses (
        (status = 200, description = "Login successful", body = [ApiResponse], content_type = "application/json"),
        (status = 400, description = "Missing fields", body = [ApiResponse]),
        (status = 401, description = "Invalid credentials", body = [ApiResponse]),
        (status = 500, description = "Credential store failure", body = [ApiResponse]),
    ),
    tag= "login"
)]
// axum handler for login
#[instrument(skip_all)]
pub async fn login(
    auth: Extension<AuthService>,
    payload: Option<Json<UserLogin>>,
) -> (StatusCode, Json<ApiResponse>) {
    let user: UserLogin = match payload {
        Some(Json(payload)) => payload,
        None => return missing_payload(),
    };

    let (Some(identifier), Some(password)) = (user.identifier.as_deref(), user.password.as_deref())
    else {
        return missing_payload();
    };

    debug!(identifier, "login attempt");

    match auth.authenticate(identifier, password).await {
        Ok(user) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                "Login successful",
                UserResponse::from(user),
            )),
        ),
        Err(error) => error_response(&error),
    }
}
