use std::sync::Arc;

use postlog_api::{
    cache::{CacheStore, LocalCache, RedisCache},
    config::AppConfig,
    create_router, db,
    posts::PgPostStore,
    users::PgUserRepository,
    AppState,
};
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_tracing();

    let config = AppConfig::from_env()?;
    info!("Postlog API - Starting...");

    info!("Connecting to database...");
    let pool = db::create_pool(&config).await?;

    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Migrations completed successfully");

    let cache = connect_cache(&config).await;
    let users = Arc::new(PgUserRepository::new(pool.clone(), config.store_timeout));
    let posts = Arc::new(PgPostStore::new(pool, config.store_timeout));

    let addr = config.bind_address();
    let app = create_router(AppState::new(config, users, posts, cache));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Postlog API is running on http://{}", addr);
    info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Connect to Redis, falling back to a process-local cache
///
/// The listing cache is an optimization; the API stays correct without it.
async fn connect_cache(config: &AppConfig) -> Arc<dyn CacheStore> {
    info!("Connecting to Redis...");

    match RedisCache::connect(&config.redis_url, config.cache_timeout).await {
        Ok(cache) => Arc::new(cache),
        Err(e) => {
            warn!("Failed to connect to Redis: {}. Using in-process cache.", e);
            Arc::new(LocalCache::new())
        }
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "postlog_api=debug,tower_http=info,sqlx=warn".into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
