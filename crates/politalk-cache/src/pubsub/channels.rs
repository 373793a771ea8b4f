//! Pub/Sub channel definitions.
//!
//! Defines the channel naming conventions for Redis Pub/Sub.

use politalk_core::Snowflake;

/// Channel prefix for topic events (votes, comments, reactions)
pub const TOPIC_CHANNEL_PREFIX: &str = "topic:";
/// Channel prefix for user-specific events
pub const USER_CHANNEL_PREFIX: &str = "user:";
/// Channel for events every subscriber receives
pub const BROADCAST_CHANNEL: &str = "broadcast";

/// Pub/Sub channel types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PubSubChannel {
    /// Events for one topic
    Topic(Snowflake),
    /// Events for a specific user (notifications)
    User(Snowflake),
    /// Topic lifecycle events (created, pinned, deleted)
    Broadcast,
}

impl PubSubChannel {
    /// Get the Redis channel name
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Topic(id) => format!("{TOPIC_CHANNEL_PREFIX}{id}"),
            Self::User(id) => format!("{USER_CHANNEL_PREFIX}{id}"),
            Self::Broadcast => BROADCAST_CHANNEL.to_string(),
        }
    }

    /// Parse a channel name back to a `PubSubChannel`
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        if name == BROADCAST_CHANNEL {
            return Some(Self::Broadcast);
        }

        if let Some(id_str) = name.strip_prefix(TOPIC_CHANNEL_PREFIX) {
            return id_str.parse::<i64>().ok().map(|id| Self::Topic(Snowflake::from(id)));
        }

        if let Some(id_str) = name.strip_prefix(USER_CHANNEL_PREFIX) {
            return id_str.parse::<i64>().ok().map(|id| Self::User(Snowflake::from(id)));
        }

        None
    }
}

impl std::fmt::Display for PubSubChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
