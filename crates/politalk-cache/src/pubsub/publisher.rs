//! Redis Pub/Sub publisher.
//!
//! Publishes domain events to Redis channels.

use crate::pool::{RedisPool, RedisResult};
use crate::pubsub::PubSubChannel;
use politalk_core::DomainEvent;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};

/// Event wrapper for Pub/Sub messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubSubEvent {
    /// Event type name (e.g., "VOTE_CAST", "COMMENT_CREATED")
    pub event_type: String,
    /// Event payload
    pub data: serde_json::Value,
}

impl PubSubEvent {
    /// Create a new event
    #[must_use]
    pub fn new(event_type: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
        }
    }

    /// Wrap a domain event
    pub fn from_domain(event: &DomainEvent) -> Result<Self, serde_json::Error> {
        Ok(Self::new(event.event_type(), serde_json::to_value(event)?))
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Channels a domain event is delivered on
#[must_use]
pub fn channels_for(event: &DomainEvent) -> Vec<PubSubChannel> {
    match event {
        DomainEvent::TopicCreated(_) | DomainEvent::TopicDeleted(_) | DomainEvent::TopicPinned(_) => {
            vec![PubSubChannel::Broadcast, PubSubChannel::Topic(event.topic_id())]
        }
        DomainEvent::NotificationCreated(e) => vec![PubSubChannel::User(e.receiver_id)],
        _ => vec![PubSubChannel::Topic(event.topic_id())],
    }
}

/// Redis Pub/Sub publisher
#[derive(Clone)]
pub struct Publisher {
    pool: RedisPool,
}

impl Publisher {
    /// Create a new publisher
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Publish an event to a channel
    pub async fn publish(&self, channel: &PubSubChannel, event: &PubSubEvent) -> RedisResult<u32> {
        self.publish_many(std::slice::from_ref(channel), event).await
    }

    /// Publish to multiple channels
    pub async fn publish_many(
        &self,
        channels: &[PubSubChannel],
        event: &PubSubEvent,
    ) -> RedisResult<u32> {
        let payload = event.to_json()?;
        let mut total_receivers = 0;
        let mut conn = self.pool.get().await?;

        for channel in channels {
            let channel_name = channel.name();
            let receivers: u32 = conn.publish(&channel_name, &payload).await?;
            total_receivers += receivers;
        }

        tracing::debug!(
            channels = channels.len(),
            event_type = %event.event_type,
            total_receivers = total_receivers,
            "Published event"
        );

        Ok(total_receivers)
    }

    /// Publish a domain event on its channels
    pub async fn publish_domain_event(&self, event: &DomainEvent) -> RedisResult<u32> {
        let wrapped = PubSubEvent::from_domain(event)?;
        self.publish_many(&channels_for(event), &wrapped).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use politalk_core::events::{NotificationCreatedEvent, TopicPinnedEvent, VoteChangedEvent};
    use politalk_core::{Identity, Snowflake};

    #[test]
    fn test_pubsub_event_from_domain() {
        let event = DomainEvent::VoteCast(VoteChangedEvent {
            topic_id: Snowflake::from(5i64),
            option_index: 1,
            vote_count: 12,
            timestamp: Utc::now(),
        });

        let wrapped = PubSubEvent::from_domain(&event).unwrap();
        assert_eq!(wrapped.event_type, "VOTE_CAST");
        assert_eq!(wrapped.data["vote_count"], 12);
        assert!(wrapped.to_json().unwrap().contains("VOTE_CAST"));
    }

    #[test]
    fn test_channels_for_events() {
        let vote = DomainEvent::VoteCast(VoteChangedEvent {
            topic_id: Snowflake::from(5i64),
            option_index: 0,
            vote_count: 1,
            timestamp: Utc::now(),
        });
        assert_eq!(channels_for(&vote), vec![PubSubChannel::Topic(Snowflake::from(5i64))]);

        let pinned = DomainEvent::TopicPinned(TopicPinnedEvent {
            topic_id: Snowflake::from(6i64),
            pinned: true,
            timestamp: Utc::now(),
        });
        assert!(channels_for(&pinned).contains(&PubSubChannel::Broadcast));

        let notification = DomainEvent::NotificationCreated(NotificationCreatedEvent {
            notification_id: Snowflake::from(9i64),
            receiver_id: Snowflake::from(77i64),
            sender: Identity::Member(Snowflake::from(3i64)),
            topic_id: Snowflake::from(5i64),
            kind: "comment".to_string(),
            timestamp: Utc::now(),
        });
        assert_eq!(
            channels_for(&notification),
            vec![PubSubChannel::User(Snowflake::from(77i64))]
        );
    }
}
