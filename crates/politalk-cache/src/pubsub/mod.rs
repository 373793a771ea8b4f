//! Redis Pub/Sub module.
//!
//! Domain events are published to Redis channels so that any delivery
//! process (push, websocket fan-out) can subscribe.

mod channels;
mod publisher;

pub use channels::{PubSubChannel, BROADCAST_CHANNEL, TOPIC_CHANNEL_PREFIX, USER_CHANNEL_PREFIX};
pub use publisher::{PubSubEvent, Publisher};
