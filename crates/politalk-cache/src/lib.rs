//! # politalk-cache
//!
//! Redis layer for refresh-token sessions, comment throttling, and pub/sub
//! event distribution.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Session Storage**: Refresh tokens per user with expiry
//! - **Throttling**: Per-identity comment cooldown
//! - **Pub/Sub**: Domain events published per topic and per user
//!
//! ## Example
//!
//! ```ignore
//! use politalk_cache::{CommentCooldown, Publisher, RedisPool, RedisPoolConfig};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//!
//! let cooldown = CommentCooldown::new(pool.clone(), 3);
//! if let CooldownStatus::Cooling { retry_after_secs } = cooldown.acquire(&identity).await? {
//!     // reject the comment
//! }
//!
//! let publisher = Publisher::new(pool.clone());
//! publisher.publish_domain_event(&event).await?;
//! ```

pub mod pool;
pub mod pubsub;
pub mod session;
pub mod throttle;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult, SharedRedisPool};

// Re-export session types
pub use session::{RefreshTokenData, RefreshTokenStore};

// Re-export throttle types
pub use throttle::{CommentCooldown, CooldownStatus};

// Re-export pubsub types
pub use pubsub::{
    PubSubChannel, PubSubEvent, Publisher, BROADCAST_CHANNEL, TOPIC_CHANNEL_PREFIX,
    USER_CHANNEL_PREFIX,
};
