//! # politalk-common
//!
//! Shared utilities including configuration, error handling, authentication
//! tokens (member and anonymous), password hashing, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{
    hash_password, validate_password_strength, verify_password, AnonymousToken, Claims,
    JwtService, TokenPair, TokenType,
};
pub use config::{
    AppConfig, AppSettings, CommunityConfig, ConfigError, CorsConfig, DatabaseConfig,
    Environment, JwtConfig, KakaoConfig, RateLimitConfig, RedisConfig, ServerConfig,
    SnowflakeConfig, StorageConfig,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
