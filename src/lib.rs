// Postlog API
// Users register and log in, then publish, edit and like short posts.
// PostgreSQL is authoritative; Redis caches the post listing.

pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod posts;
pub mod users;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

use axum::{
    extract::FromRef,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use auth::{require_auth, AuthService, TokenService};
use cache::CacheStore;
use config::AppConfig;
use posts::{PostRepository, PostService, PostStore};
use users::{UserRepository, UserService};

/// Adds the bearer token scheme referenced by protected paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::login_handler,
        users::handlers::create_user_handler,
        users::handlers::get_user_handler,
        users::handlers::update_user_handler,
        users::handlers::delete_user_handler,
        users::handlers::update_password_handler,
        posts::handlers::create_post_handler,
        posts::handlers::list_posts_handler,
        posts::handlers::get_post_handler,
        posts::handlers::update_post_handler,
        posts::handlers::delete_post_handler,
        posts::handlers::like_post_handler,
        posts::handlers::dislike_post_handler,
    ),
    components(
        schemas(
            auth::LoginRequest,
            auth::AuthResponse,
            users::User,
            users::CreateUserRequest,
            users::UpdateUserRequest,
            users::UpdatePasswordRequest,
            posts::Post,
            posts::PostInput,
            posts::CreatedPost,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Session token issuance"),
        (name = "users", description = "User account management"),
        (name = "posts", description = "Posts, likes and the cached listing")
    ),
    info(
        title = "Postlog API",
        version = "0.1.0",
        description = "Minimal blogging backend with token authentication"
    )
)]
pub struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: TokenService,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub post_service: PostService,
}

impl AppState {
    /// Wire the services over the given storage seams
    pub fn new(
        config: AppConfig,
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostStore>,
        cache: Arc<dyn CacheStore>,
    ) -> Self {
        let tokens = TokenService::new(&config.secret_key);

        Self {
            auth_service: AuthService::new(users.clone(), tokens.clone()),
            user_service: UserService::new(users),
            post_service: PostService::new(PostRepository::new(posts, cache)),
            tokens,
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for TokenService {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

fn cors_layer(allowed_origin: &str) -> CorsLayer {
    let origin = match HeaderValue::from_str(allowed_origin) {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(_) => {
            tracing::warn!("Ignoring unusable CORS origin '{}'", allowed_origin);
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        // Wildcard headers cannot be combined with credentials
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Creates and configures the application router
///
/// Login and registration are public. Every other API route passes the
/// `require_auth` guard before its handler runs.
pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/login", post(auth::login_handler))
        .route("/api/users", post(users::create_user_handler));

    let protected = Router::new()
        .route(
            "/api/users/:id",
            get(users::get_user_handler)
                .put(users::update_user_handler)
                .delete(users::delete_user_handler),
        )
        .route(
            "/api/users/:id/update-password",
            post(users::update_password_handler),
        )
        .route(
            "/api/posts",
            post(posts::create_post_handler).get(posts::list_posts_handler),
        )
        .route(
            "/api/posts/:id",
            get(posts::get_post_handler)
                .put(posts::update_post_handler)
                .delete(posts::delete_post_handler),
        )
        .route("/api/posts/:id/like", post(posts::like_post_handler))
        .route("/api/posts/:id/dislike", post(posts::dislike_post_handler))
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            require_auth,
        ));

    let layers = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(state.config.request_timeout))
        .layer(cors_layer(&state.config.allowed_origin));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public)
        .merge(protected)
        .layer(layers)
        .with_state(state)
}
