//! Write throttling module.

mod comment_cooldown;

pub use comment_cooldown::{CommentCooldown, CooldownStatus};
