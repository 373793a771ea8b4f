//! Service context - dependency container for services
//!
//! Holds all repositories, cache stores, and other dependencies needed by services.

use std::sync::Arc;
use std::time::Duration;

use politalk_cache::{CommentCooldown, Publisher, RefreshTokenStore, SharedRedisPool};
use politalk_common::auth::JwtService;
use politalk_common::{AppConfig, KakaoConfig, StorageConfig};
use politalk_core::traits::{
    AnonymousAliasRepository, CommentRepository, NotificationRepository, ReactionRepository,
    TopicRepository, UserRepository, VoteRepository,
};
use politalk_core::{DomainError, DomainEvent, Identity, Snowflake, SnowflakeGenerator, User};
use politalk_db::PgPool;
use tracing::warn;

use super::error::{ServiceError, ServiceResult};
use super::upload::ImageStore;

/// Tunables the services read at request time
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Default page size for topic and comment listings
    pub page_size: u32,
    /// Seconds between two comments of one identity
    pub comment_cooldown_secs: u64,
    /// Lifetime of stored refresh-token sessions
    pub refresh_token_ttl_secs: u64,
    pub storage: StorageConfig,
    pub kakao: KakaoConfig,
}

impl ServiceSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            page_size: config.community.page_size,
            comment_cooldown_secs: config.community.comment_cooldown_secs,
            refresh_token_ttl_secs: config.jwt.refresh_token_expiry.max(0) as u64,
            storage: config.storage.clone(),
            kakao: config.kakao.clone(),
        }
    }
}

/// One page of a listing, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub size: u32,
}

impl Page {
    #[inline]
    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }

    #[inline]
    pub fn offset(&self) -> i64 {
        i64::from(self.number - 1) * i64::from(self.size)
    }
}

impl ServiceSettings {
    /// Resolve a requested page number, treating 0 and absent as the first page
    pub fn page(&self, requested: Option<u32>) -> Page {
        Page {
            number: requested.unwrap_or(1).max(1),
            size: self.page_size.max(1),
        }
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            page_size: 10,
            comment_cooldown_secs: 3,
            refresh_token_ttl_secs: 604_800,
            storage: StorageConfig::default(),
            kakao: KakaoConfig::default(),
        }
    }
}

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Database repositories
/// - Redis stores (sessions, comment cooldown)
/// - The pub/sub publisher
/// - JWT service and Snowflake generator
/// - The image store and the outbound HTTP client
#[derive(Clone)]
pub struct ServiceContext {
    // Database pool
    pool: PgPool,

    // Redis pool
    redis_pool: SharedRedisPool,

    // Repositories
    user_repo: Arc<dyn UserRepository>,
    topic_repo: Arc<dyn TopicRepository>,
    vote_repo: Arc<dyn VoteRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    reaction_repo: Arc<dyn ReactionRepository>,
    alias_repo: Arc<dyn AnonymousAliasRepository>,
    notification_repo: Arc<dyn NotificationRepository>,

    // Cache stores
    refresh_token_store: RefreshTokenStore,
    comment_cooldown: CommentCooldown,

    // Pub/Sub
    publisher: Publisher,

    // Services
    jwt_service: Arc<JwtService>,
    snowflake_generator: Arc<SnowflakeGenerator>,
    image_store: ImageStore,
    http_client: reqwest::Client,
    settings: Arc<ServiceSettings>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: PgPool,
        redis_pool: SharedRedisPool,
        user_repo: Arc<dyn UserRepository>,
        topic_repo: Arc<dyn TopicRepository>,
        vote_repo: Arc<dyn VoteRepository>,
        comment_repo: Arc<dyn CommentRepository>,
        reaction_repo: Arc<dyn ReactionRepository>,
        alias_repo: Arc<dyn AnonymousAliasRepository>,
        notification_repo: Arc<dyn NotificationRepository>,
        jwt_service: Arc<JwtService>,
        snowflake_generator: Arc<SnowflakeGenerator>,
        settings: ServiceSettings,
    ) -> ServiceResult<Self> {
        // Clone the inner RedisPool from the Arc
        let inner_pool = (*redis_pool).clone();
        let refresh_token_store =
            RefreshTokenStore::with_ttl(inner_pool.clone(), settings.refresh_token_ttl_secs);
        let comment_cooldown =
            CommentCooldown::new(inner_pool.clone(), settings.comment_cooldown_secs);
        let publisher = Publisher::new(inner_pool);

        let image_store = ImageStore::new(&settings.storage);
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.kakao.timeout_secs))
            .build()
            .map_err(|e| ServiceError::internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            pool,
            redis_pool,
            user_repo,
            topic_repo,
            vote_repo,
            comment_repo,
            reaction_repo,
            alias_repo,
            notification_repo,
            refresh_token_store,
            comment_cooldown,
            publisher,
            jwt_service,
            snowflake_generator,
            image_store,
            http_client,
            settings: Arc::new(settings),
        })
    }

    // === Pools ===

    /// Get the PostgreSQL connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get the Redis connection pool
    pub fn redis_pool(&self) -> &SharedRedisPool {
        &self.redis_pool
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn topic_repo(&self) -> &dyn TopicRepository {
        self.topic_repo.as_ref()
    }

    pub fn vote_repo(&self) -> &dyn VoteRepository {
        self.vote_repo.as_ref()
    }

    pub fn comment_repo(&self) -> &dyn CommentRepository {
        self.comment_repo.as_ref()
    }

    pub fn reaction_repo(&self) -> &dyn ReactionRepository {
        self.reaction_repo.as_ref()
    }

    pub fn alias_repo(&self) -> &dyn AnonymousAliasRepository {
        self.alias_repo.as_ref()
    }

    pub fn notification_repo(&self) -> &dyn NotificationRepository {
        self.notification_repo.as_ref()
    }

    // === Cache Stores ===

    /// Get the refresh token store
    pub fn refresh_token_store(&self) -> &RefreshTokenStore {
        &self.refresh_token_store
    }

    /// Get the per-identity comment cooldown
    pub fn comment_cooldown(&self) -> &CommentCooldown {
        &self.comment_cooldown
    }

    // === Pub/Sub ===

    /// Get the Redis pub/sub publisher
    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    /// Publish a domain event. Delivery is best effort: a Redis failure is
    /// logged and never fails the request that produced the event.
    pub async fn publish(&self, event: DomainEvent) {
        if let Err(e) = self.publisher.publish_domain_event(&event).await {
            warn!(
                event_type = event.event_type(),
                topic_id = %event.topic_id(),
                error = %e,
                "Failed to publish event"
            );
        }
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Get the snowflake ID generator
    pub fn snowflake_generator(&self) -> &SnowflakeGenerator {
        self.snowflake_generator.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }

    pub fn image_store(&self) -> &ImageStore {
        &self.image_store
    }

    pub fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    // === Shared lookups ===

    /// Load a user or fail with `UserNotFound`
    pub async fn require_user(&self, user_id: Snowflake) -> ServiceResult<User> {
        self.user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(user_id).into())
    }

    /// Load a user and check the admin role
    pub async fn require_admin(&self, user_id: Snowflake) -> ServiceResult<User> {
        let user = self.require_user(user_id).await?;
        if !user.is_admin() {
            return Err(DomainError::AdminRequired.into());
        }
        Ok(user)
    }

    /// Whether the identity is a signed-in admin
    pub async fn is_admin(&self, identity: &Identity) -> ServiceResult<bool> {
        let Some(user_id) = identity.member_id() else {
            return Ok(false);
        };
        Ok(self
            .user_repo()
            .find_by_id(user_id)
            .await?
            .is_some_and(|user| user.is_admin()))
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &"PgPool")
            .field("redis_pool", &"SharedRedisPool")
            .field("repositories", &"...")
            .field("cache_stores", &"...")
            .field("settings", &self.settings)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    redis_pool: Option<SharedRedisPool>,
    user_repo: Option<Arc<dyn UserRepository>>,
    topic_repo: Option<Arc<dyn TopicRepository>>,
    vote_repo: Option<Arc<dyn VoteRepository>>,
    comment_repo: Option<Arc<dyn CommentRepository>>,
    reaction_repo: Option<Arc<dyn ReactionRepository>>,
    alias_repo: Option<Arc<dyn AnonymousAliasRepository>>,
    notification_repo: Option<Arc<dyn NotificationRepository>>,
    jwt_service: Option<Arc<JwtService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    settings: ServiceSettings,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            pool: None,
            redis_pool: None,
            user_repo: None,
            topic_repo: None,
            vote_repo: None,
            comment_repo: None,
            reaction_repo: None,
            alias_repo: None,
            notification_repo: None,
            jwt_service: None,
            snowflake_generator: None,
            settings: ServiceSettings::default(),
        }
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn redis_pool(mut self, redis_pool: SharedRedisPool) -> Self {
        self.redis_pool = Some(redis_pool);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn topic_repo(mut self, repo: Arc<dyn TopicRepository>) -> Self {
        self.topic_repo = Some(repo);
        self
    }

    pub fn vote_repo(mut self, repo: Arc<dyn VoteRepository>) -> Self {
        self.vote_repo = Some(repo);
        self
    }

    pub fn comment_repo(mut self, repo: Arc<dyn CommentRepository>) -> Self {
        self.comment_repo = Some(repo);
        self
    }

    pub fn reaction_repo(mut self, repo: Arc<dyn ReactionRepository>) -> Self {
        self.reaction_repo = Some(repo);
        self
    }

    pub fn alias_repo(mut self, repo: Arc<dyn AnonymousAliasRepository>) -> Self {
        self.alias_repo = Some(repo);
        self
    }

    pub fn notification_repo(mut self, repo: Arc<dyn NotificationRepository>) -> Self {
        self.notification_repo = Some(repo);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn settings(mut self, settings: ServiceSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        ServiceContext::new(
            self.pool.ok_or_else(|| ServiceError::validation("pool is required"))?,
            self.redis_pool
                .ok_or_else(|| ServiceError::validation("redis_pool is required"))?,
            self.user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            self.topic_repo
                .ok_or_else(|| ServiceError::validation("topic_repo is required"))?,
            self.vote_repo
                .ok_or_else(|| ServiceError::validation("vote_repo is required"))?,
            self.comment_repo
                .ok_or_else(|| ServiceError::validation("comment_repo is required"))?,
            self.reaction_repo
                .ok_or_else(|| ServiceError::validation("reaction_repo is required"))?,
            self.alias_repo
                .ok_or_else(|| ServiceError::validation("alias_repo is required"))?,
            self.notification_repo
                .ok_or_else(|| ServiceError::validation("notification_repo is required"))?,
            self.jwt_service
                .ok_or_else(|| ServiceError::validation("jwt_service is required"))?,
            self.snowflake_generator
                .ok_or_else(|| ServiceError::validation("snowflake_generator is required"))?,
            self.settings,
        )
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
