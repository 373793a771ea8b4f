//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in politalk-core.
//! Each repository handles database operations for a specific domain entity.

mod alias;
mod comment;
mod error;
mod notification;
mod reaction;
mod topic;
mod user;
mod vote;

pub use alias::PgAnonymousAliasRepository;
pub use comment::PgCommentRepository;
pub use notification::PgNotificationRepository;
pub use reaction::PgReactionRepository;
pub use topic::PgTopicRepository;
pub use user::PgUserRepository;
pub use vote::PgVoteRepository;
