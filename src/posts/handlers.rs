// HTTP handlers for post endpoints
// Every route here sits behind the `require_auth` route layer.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::auth::middleware::AuthenticatedUser;
use crate::error::ApiError;
use crate::posts::models::{CreatedPost, Post, PostInput};
use crate::validation::parse_id;
use crate::AppState;

/// Create a new post authored by the caller
/// POST /api/posts
#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = PostInput,
    responses(
        (status = 201, description = "Post created", body = CreatedPost),
        (status = 400, description = "Blank title or content"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "posts"
)]
pub async fn create_post_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(input): Json<PostInput>,
) -> Result<(StatusCode, Json<CreatedPost>), ApiError> {
    tracing::debug!("Creating post for user {}", user.user_id);

    let id = state.post_service.create_post(user.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(CreatedPost { id })))
}

/// List all posts, newest first
/// GET /api/posts
#[utoipa::path(
    get,
    path = "/api/posts",
    responses(
        (status = 200, description = "All posts, newest first", body = Vec<Post>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "posts"
)]
pub async fn list_posts_handler(State(state): State<AppState>) -> Result<Json<Vec<Post>>, ApiError> {
    let posts = state.post_service.list_posts().await?;
    Ok(Json(posts))
}

/// GET /api/posts/{id}
#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    params(("id" = String, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post found", body = Post),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = [])),
    tag = "posts"
)]
pub async fn get_post_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Post>, ApiError> {
    let post_id = parse_id(&id)?;
    let post = state.post_service.get_post(post_id).await?;
    Ok(Json(post))
}

/// Update title and content of the caller's post
/// PUT /api/posts/{id}
#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    params(("id" = String, Path, description = "Post ID")),
    request_body = PostInput,
    responses(
        (status = 204, description = "Post updated"),
        (status = 400, description = "Malformed id or blank fields"),
        (status = 403, description = "Post belongs to another user"),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = [])),
    tag = "posts"
)]
pub async fn update_post_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(input): Json<PostInput>,
) -> Result<StatusCode, ApiError> {
    let post_id = parse_id(&id)?;
    state
        .post_service
        .update_post(post_id, user.user_id, input)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete the caller's post
/// DELETE /api/posts/{id}
#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    params(("id" = String, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 403, description = "Post belongs to another user"),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = [])),
    tag = "posts"
)]
pub async fn delete_post_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let post_id = parse_id(&id)?;
    state.post_service.delete_post(post_id, user.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/posts/{id}/like
#[utoipa::path(
    post,
    path = "/api/posts/{id}/like",
    params(("id" = String, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Like recorded"),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = [])),
    tag = "posts"
)]
pub async fn like_post_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.post_service.like_post(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/posts/{id}/dislike
#[utoipa::path(
    post,
    path = "/api/posts/{id}/dislike",
    params(("id" = String, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Like removed (never below zero)"),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = [])),
    tag = "posts"
)]
pub async fn dislike_post_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.post_service.dislike_post(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
