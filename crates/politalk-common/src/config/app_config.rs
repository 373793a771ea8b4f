//! Application configuration
//!
//! Two ways in: [`AppConfig::from_env`] reads flat environment variables
//! (`DATABASE_URL`, `JWT_SECRET`, ...) the way a `.env` file lists them, and
//! [`AppConfig::load`] layers an optional config file under
//! `POLITALK__SECTION__KEY` environment overrides.

use config::builder::{ConfigBuilder, DefaultState};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

const ENV_PREFIX: &str = "POLITALK";

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub snowflake: SnowflakeConfig,
    #[serde(default)]
    pub community: CommunityConfig,
    #[serde(default)]
    pub kakao: KakaoConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            env: Environment::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Apply pending migrations at startup
    #[serde(default = "default_true")]
    pub run_migrations: bool,
    /// Overrides the migrations directory bundled with the db crate
    #[serde(default)]
    pub migrations_dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
}

/// Token lifetimes are in seconds
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry: i64,
    #[serde(default = "default_anonymous_token_expiry")]
    pub anonymous_token_expiry: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: default_requests_per_second(),
            burst: default_burst(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Uploaded images
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Images are written to `<upload_dir>/images`
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    /// Prefix of returned image URLs
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: u32,
}

impl StorageConfig {
    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb as usize * 1024 * 1024
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            public_base_url: default_public_base_url(),
            max_file_size_mb: default_max_file_size(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnowflakeConfig {
    #[serde(default)]
    pub worker_id: u16,
}

/// Community behaviour knobs
#[derive(Debug, Clone, Deserialize)]
pub struct CommunityConfig {
    /// Minimum seconds between two comments from one identity
    #[serde(default = "default_comment_cooldown")]
    pub comment_cooldown_secs: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            comment_cooldown_secs: default_comment_cooldown(),
            page_size: default_page_size(),
        }
    }
}

/// Kakao social login
#[derive(Debug, Clone, Deserialize)]
pub struct KakaoConfig {
    #[serde(default = "default_kakao_profile_url")]
    pub profile_url: String,
    #[serde(default = "default_kakao_timeout")]
    pub timeout_secs: u64,
}

impl Default for KakaoConfig {
    fn default() -> Self {
        Self {
            profile_url: default_kakao_profile_url(),
            timeout_secs: default_kakao_timeout(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "politalk".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    2
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_access_token_expiry() -> i64 {
    900 // 15 minutes
}

fn default_refresh_token_expiry() -> i64 {
    604_800 // 7 days
}

fn default_anonymous_token_expiry() -> i64 {
    31_536_000 // 365 days
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

fn default_upload_dir() -> String {
    "./uploads".to_string()
}

fn default_public_base_url() -> String {
    "/images".to_string()
}

fn default_max_file_size() -> u32 {
    5
}

fn default_comment_cooldown() -> u64 {
    3
}

fn default_page_size() -> u32 {
    10
}

fn default_kakao_profile_url() -> String {
    "https://kapi.kakao.com/v2/user/me".to_string()
}

fn default_kakao_timeout() -> u64 {
    5
}

/// Required variable
fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingVar(key))
}

/// Optional variable; present-but-unparsable is an error
fn optional<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        Err(_) => Ok(None),
    }
}

fn or_default<T: FromStr>(key: &'static str, default: fn() -> T) -> Result<T, ConfigError> {
    Ok(optional(key)?.unwrap_or_else(default))
}

impl AppConfig {
    /// Load configuration from environment variables (and `.env` if present)
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or a value does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let env = match env::var("APP_ENV") {
            Ok(raw) => Environment::parse(&raw).ok_or(ConfigError::InvalidValue("APP_ENV", raw))?,
            Err(_) => Environment::default(),
        };

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env,
            },
            api: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| default_host()),
                port: optional("API_PORT")?.ok_or(ConfigError::MissingVar("API_PORT"))?,
            },
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                max_connections: or_default("DATABASE_MAX_CONNECTIONS", default_max_connections)?,
                min_connections: or_default("DATABASE_MIN_CONNECTIONS", default_min_connections)?,
                run_migrations: or_default("DATABASE_RUN_MIGRATIONS", default_true)?,
                migrations_dir: env::var("DATABASE_MIGRATIONS_DIR").ok(),
            },
            redis: RedisConfig {
                url: required("REDIS_URL")?,
                max_connections: or_default(
                    "REDIS_MAX_CONNECTIONS",
                    default_redis_max_connections,
                )?,
            },
            jwt: JwtConfig {
                secret: required("JWT_SECRET")?,
                access_token_expiry: or_default(
                    "JWT_ACCESS_TOKEN_EXPIRY",
                    default_access_token_expiry,
                )?,
                refresh_token_expiry: or_default(
                    "JWT_REFRESH_TOKEN_EXPIRY",
                    default_refresh_token_expiry,
                )?,
                anonymous_token_expiry: or_default(
                    "JWT_ANONYMOUS_TOKEN_EXPIRY",
                    default_anonymous_token_expiry,
                )?,
            },
            rate_limit: RateLimitConfig {
                requests_per_second: or_default(
                    "RATE_LIMIT_REQUESTS_PER_SECOND",
                    default_requests_per_second,
                )?,
                burst: or_default("RATE_LIMIT_BURST", default_burst)?,
            },
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .ok()
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|o| !o.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            storage: StorageConfig {
                upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| default_upload_dir()),
                public_base_url: env::var("PUBLIC_IMAGE_BASE_URL")
                    .unwrap_or_else(|_| default_public_base_url()),
                max_file_size_mb: or_default("MAX_FILE_SIZE_MB", default_max_file_size)?,
            },
            snowflake: SnowflakeConfig {
                worker_id: or_default("WORKER_ID", || 0)?,
            },
            community: CommunityConfig {
                comment_cooldown_secs: or_default(
                    "COMMENT_COOLDOWN_SECS",
                    default_comment_cooldown,
                )?,
                page_size: or_default("PAGE_SIZE", default_page_size)?,
            },
            kakao: KakaoConfig {
                profile_url: env::var("KAKAO_PROFILE_URL")
                    .unwrap_or_else(|_| default_kakao_profile_url()),
                timeout_secs: or_default("KAKAO_TIMEOUT_SECS", default_kakao_timeout)?,
            },
        })
    }

    /// Load from an optional config file (TOML, YAML, or JSON by extension)
    /// overlaid with `POLITALK__SECTION__KEY` environment variables
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or required keys are missing
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }
        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins"),
            )
            .build()?
            .try_deserialize()
            .map_err(ConfigError::from)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}
