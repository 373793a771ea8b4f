//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use politalk_cache::{RedisPool, RedisPoolConfig};
use politalk_common::{AppConfig, AppError, JwtService};
use politalk_core::SnowflakeGenerator;
use politalk_db::{
    create_pool, run_migrations, PgAnonymousAliasRepository, PgCommentRepository,
    PgNotificationRepository, PgReactionRepository, PgTopicRepository, PgUserRepository,
    PgVoteRepository, PoolConfig,
};
use politalk_service::{ServiceContextBuilder, ServiceSettings};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::info;

use crate::middleware::{apply_middleware, with_common_layers};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();
    let image_store = state.image_store();

    let api = apply_middleware(
        create_router(image_store.max_bytes()),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    )?;

    // Health checks and images bypass the rate limiter
    let router = api
        .merge(with_common_layers(health_routes()))
        .nest_service("/images", ServeDir::new(image_store.root()));

    Ok(router.with_state(state))
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    // Create database pool
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&PoolConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool, config.database.migrations_dir.as_deref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
    }

    // Create Redis pool
    info!("Connecting to Redis...");
    let redis_pool = RedisPool::new(RedisPoolConfig::from(&config.redis))
        .map_err(|e| AppError::Cache(e.to_string()))?;
    let shared_redis = Arc::new(redis_pool);
    info!("Redis connection established");

    // Create JWT service
    let jwt_service = Arc::new(JwtService::from_config(&config.jwt));

    // Create Snowflake generator
    let snowflake_generator = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));

    // Build service context
    let service_context = ServiceContextBuilder::new()
        .pool(pool.clone())
        .redis_pool(shared_redis)
        .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
        .topic_repo(Arc::new(PgTopicRepository::new(pool.clone())))
        .vote_repo(Arc::new(PgVoteRepository::new(pool.clone())))
        .comment_repo(Arc::new(PgCommentRepository::new(pool.clone())))
        .reaction_repo(Arc::new(PgReactionRepository::new(pool.clone())))
        .alias_repo(Arc::new(PgAnonymousAliasRepository::new(pool.clone())))
        .notification_repo(Arc::new(PgNotificationRepository::new(pool)))
        .jwt_service(jwt_service)
        .snowflake_generator(snowflake_generator)
        .settings(ServiceSettings::from_config(&config))
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address: {e}")))?;

    // Create app state
    let state = create_app_state(config).await?;

    // Build application
    let app = create_app(state)?;

    // Run server
    run_server(app, addr).await
}
