//! # politalk-core
//!
//! Domain layer containing entities, value objects, policy rules, repository traits,
//! and domain events. This crate has zero dependencies on infrastructure
//! (database, web framework, etc.).
//!
//! The policy module holds the rules that decide who may vote, comment, and react,
//! how anonymous commenters are labelled, and how comments and topics are ranked.

pub mod entities;
pub mod error;
pub mod events;
pub mod policy;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    AnonymousAlias, AuthProvider, Category, Comment, Notification, NotificationKind, Reaction,
    ReactionChange, ReactionKind, ReactionOutcome, ReactionTally, ReportOutcome, Topic,
    TopicOption, TopicWithActivity, User, UserRole, Visibility, VoteCancellation, VoteRecord,
};
pub use error::DomainError;
pub use events::DomainEvent;
pub use policy::{AliasAllocator, CommentTarget, HotWindow};
pub use traits::{
    AccountPurge, AnonymousAliasRepository, CommentQuery, CommentReceipt, CommentRepository,
    CommentSort, NotificationRepository, ReactionRepository, RepoResult, TopicQuery,
    TopicRepository, TopicSort, UserRepository, VoteRepository,
};
pub use value_objects::{
    AnonymousId, Identity, IdentityParseError, Snowflake, SnowflakeGenerator, SnowflakeParseError,
};
