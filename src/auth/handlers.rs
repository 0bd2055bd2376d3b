// HTTP handlers for authentication endpoints

use axum::{extract::State, Json};

use crate::auth::models::{AuthResponse, LoginRequest};
use crate::error::ApiError;
use crate::AppState;

/// Exchange email and password for a session token
/// POST /api/login
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Wrong password"),
        (status = 404, description = "No user with that email")
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    tracing::debug!("Login attempt for {}", request.email.trim());

    let response = state.auth_service.login(request).await?;
    Ok(Json(response))
}
