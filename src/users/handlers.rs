// HTTP handlers for user endpoints
// Registration is public; everything else runs behind `require_auth`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::auth::middleware::AuthenticatedUser;
use crate::error::ApiError;
use crate::users::models::{CreateUserRequest, UpdatePasswordRequest, UpdateUserRequest, User};
use crate::validation::parse_id;
use crate::AppState;

/// Register a new user
/// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Missing field or malformed email"),
        (status = 409, description = "Email or nick already taken")
    ),
    tag = "users"
)]
pub async fn create_user_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    tracing::debug!("Registering user with nick {}", request.nick.trim());

    let user = state.user_service.register(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/users/{id}
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let user = state.user_service.get_user(parse_id(&id)?).await?;
    Ok(Json(user))
}

/// Update the caller's own profile
/// PUT /api/users/{id}
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 204, description = "User updated"),
        (status = 403, description = "Not the caller's account"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email or nick already taken")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn update_user_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<StatusCode, ApiError> {
    let user_id = parse_id(&id)?;
    state
        .user_service
        .update_user(user_id, user.user_id, request)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/users/{id}
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 403, description = "Not the caller's account"),
        (status = 404, description = "User not found"),
        (status = 409, description = "User still has posts")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn delete_user_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let user_id = parse_id(&id)?;
    state.user_service.delete_user(user_id, user.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Change the caller's own password
/// POST /api/users/{id}/update-password
#[utoipa::path(
    post,
    path = "/api/users/{id}/update-password",
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdatePasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 401, description = "Current password is wrong"),
        (status = 403, description = "Not the caller's account")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn update_password_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<UpdatePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    let user_id = parse_id(&id)?;
    state
        .user_service
        .update_password(user_id, user.user_id, request)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
