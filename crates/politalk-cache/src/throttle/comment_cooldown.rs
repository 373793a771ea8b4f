//! Per-identity comment cooldown.
//!
//! An identity may post one comment per window. The first comment sets a
//! marker key with the window as TTL; later comments are refused until it
//! expires.

use crate::pool::{RedisPool, RedisResult};
use politalk_core::Identity;

/// Key prefix for cooldown markers
const COOLDOWN_PREFIX: &str = "comment_cooldown:";

/// Result of trying to start a cooldown window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownStatus {
    /// No window was active; one has now started
    Ready,
    /// A window is active
    Cooling { retry_after_secs: u64 },
}

impl CooldownStatus {
    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Redis-backed comment cooldown
#[derive(Clone)]
pub struct CommentCooldown {
    pool: RedisPool,
    window_secs: u64,
}

impl CommentCooldown {
    /// Create a cooldown with the given window in seconds
    #[must_use]
    pub fn new(pool: RedisPool, window_secs: u64) -> Self {
        Self { pool, window_secs }
    }

    fn key(identity: &Identity) -> String {
        format!("{COOLDOWN_PREFIX}{}", identity.key())
    }

    /// Start a window for `identity` unless one is active.
    ///
    /// A zero window disables the cooldown.
    pub async fn acquire(&self, identity: &Identity) -> RedisResult<CooldownStatus> {
        if self.window_secs == 0 {
            return Ok(CooldownStatus::Ready);
        }

        let key = Self::key(identity);
        if self.pool.set_nx_ex(&key, self.window_secs).await? {
            return Ok(CooldownStatus::Ready);
        }

        let retry_after_secs = self.pool.ttl(&key).await?.unwrap_or(0).max(1);

        tracing::debug!(identity = %identity, retry_after_secs, "Comment cooldown active");

        Ok(CooldownStatus::Cooling { retry_after_secs })
    }

    /// Clear the window (e.g. when the comment could not be stored)
    pub async fn release(&self, identity: &Identity) -> RedisResult<()> {
        self.pool.delete(&Self::key(identity)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::RedisPoolConfig;
    use politalk_core::{AnonymousId, Snowflake};

    #[test]
    fn test_key_uses_identity_key() {
        let member = Identity::Member(Snowflake::new(42));
        assert_eq!(CommentCooldown::key(&member), "comment_cooldown:u:42");

        let anon = Identity::Anonymous(AnonymousId::generate());
        assert!(CommentCooldown::key(&anon).starts_with("comment_cooldown:a:"));
    }

    #[tokio::test]
    async fn test_zero_window_never_touches_redis() {
        // Unreachable server: any Redis call would fail
        let pool = RedisPool::new(RedisPoolConfig {
            url: "redis://127.0.0.1:1".to_string(),
            max_connections: 1,
        })
        .unwrap();
        let cooldown = CommentCooldown::new(pool, 0);
        let status = cooldown
            .acquire(&Identity::Member(Snowflake::new(1)))
            .await
            .unwrap();
        assert!(status.is_ready());
    }
}
