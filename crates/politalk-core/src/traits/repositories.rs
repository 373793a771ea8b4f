//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer states what it needs; the infrastructure layer provides
//! the implementation. Every counter these traits mutate (votes, reactions,
//! reports, views) must be changed atomically by the implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{
    AnonymousAlias, Category, Comment, Notification, Reaction, ReactionKind, ReactionOutcome,
    ReportOutcome, Topic, TopicWithActivity, User, UserRole, VoteCancellation, VoteRecord,
};
use crate::error::DomainError;
use crate::value_objects::{AnonymousId, Identity, Snowflake};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

/// What went away with a self-deleted account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccountPurge {
    pub topics: u64,
    pub comments: u64,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Find several users at once (missing ids are skipped)
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Find user by social login id (e.g. `kakao_123`)
    async fn find_by_external_id(&self, external_id: &str) -> RepoResult<Option<User>>;

    /// Check if email is already taken
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Check if nickname is already taken
    async fn nickname_exists(&self, nickname: &str) -> RepoResult<bool>;

    /// Create a new user. Social accounts have no password.
    async fn create(&self, user: &User, password_hash: Option<&str>) -> RepoResult<()>;

    /// Update nickname and avatar
    async fn update(&self, user: &User) -> RepoResult<()>;

    /// Change a user's role
    async fn set_role(&self, id: Snowflake, role: UserRole) -> RepoResult<()>;

    /// Delete a user
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Delete the user's topics and comments, then the account, in one
    /// transaction. Received notifications go with the account.
    async fn delete_account(&self, id: Snowflake) -> RepoResult<AccountPurge>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>>;

    /// List users, newest first
    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<User>>;
}

// ============================================================================
// Topic Repository
// ============================================================================

/// Ordering for topic listings. Pinned topics always come first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TopicSort {
    #[default]
    Latest,
    /// `views + 3 * comments`
    Popular,
}

#[derive(Debug, Clone, Default)]
pub struct TopicQuery {
    pub category: Option<Category>,
    pub sort: TopicSort,
    pub limit: i64,
    pub offset: i64,
}

#[async_trait]
pub trait TopicRepository: Send + Sync {
    /// Find topic by ID, options included
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Topic>>;

    /// Find several topics at once
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Topic>>;

    /// Create a topic with its options
    async fn create(&self, topic: &Topic) -> RepoResult<()>;

    /// Delete a topic with its options, votes, and comments
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Pin or unpin
    async fn set_pinned(&self, id: Snowflake, pinned: bool) -> RepoResult<()>;

    /// Add one view, returning the new view count
    async fn increment_views(&self, id: Snowflake) -> RepoResult<i64>;

    /// Record one report per identity, returning the new report count
    async fn report(&self, id: Snowflake, reporter: &Identity) -> RepoResult<i32>;

    /// Page of topics with comment counts
    async fn list(&self, query: &TopicQuery) -> RepoResult<Vec<TopicWithActivity>>;

    /// Number of topics matching the category filter
    async fn count(&self, category: Option<Category>) -> RepoResult<i64>;

    /// Topics written by `author`, newest first
    async fn find_by_author(
        &self,
        author: &Identity,
        limit: i64,
    ) -> RepoResult<Vec<TopicWithActivity>>;

    /// Pinned topics (newest first) plus the most popular unpinned topics
    /// created since `since`
    async fn find_hot_candidates(
        &self,
        since: DateTime<Utc>,
        limit: i64,
    ) -> RepoResult<Vec<TopicWithActivity>>;
}

// ============================================================================
// Vote Repository
// ============================================================================

#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// The identity's active vote on a topic
    async fn find(&self, topic_id: Snowflake, voter: &Identity) -> RepoResult<Option<VoteRecord>>;

    /// Record the vote and bump its option in one transaction.
    /// Fails with `AlreadyVoted` when a vote exists. Returns the option's new tally.
    async fn cast(&self, vote: &VoteRecord) -> RepoResult<i64>;

    /// Remove the vote and decrement its option (floored at zero) in one
    /// transaction. Fails with `CommentAlreadyPosted` when the voter has a
    /// comment under the voted option.
    async fn cancel(&self, topic_id: Snowflake, voter: &Identity)
        -> RepoResult<VoteCancellation>;

    /// The identity's votes, newest first
    async fn find_by_voter(&self, voter: &Identity, limit: i64) -> RepoResult<Vec<VoteRecord>>;
}

// ============================================================================
// Comment Repository
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentSort {
    #[default]
    Latest,
    Score,
}

/// Top-level comments of a topic, optionally restricted to one option's thread
#[derive(Debug, Clone)]
pub struct CommentQuery {
    pub topic_id: Snowflake,
    pub option_index: Option<usize>,
    pub sort: CommentSort,
    pub limit: i64,
    pub offset: i64,
}

/// Values settled by the database while storing a comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentReceipt {
    /// Taken under the topic's label lock, so anonymous first comments and
    /// their ordinals share one order
    pub created_at: DateTime<Utc>,
    /// The author's label, for anonymous authors
    pub alias: Option<AnonymousAlias>,
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Find comment by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>>;

    /// Create a comment. With `requires_vote` set, the insert only happens
    /// while the author still holds a vote for that option, otherwise it fails
    /// with `VoteRequired`. Anonymous authors get their topic label in the
    /// same transaction.
    async fn create(
        &self,
        comment: &Comment,
        requires_vote: Option<usize>,
    ) -> RepoResult<CommentReceipt>;

    /// Delete a comment and its replies
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Page of top-level comments
    async fn list(&self, query: &CommentQuery) -> RepoResult<Vec<Comment>>;

    /// Number of top-level comments matching the query's topic and option
    async fn count(&self, topic_id: Snowflake, option_index: Option<usize>) -> RepoResult<i64>;

    /// Replies to the given comments, oldest first
    async fn find_replies(&self, parent_ids: &[Snowflake]) -> RepoResult<Vec<Comment>>;

    /// Visible top-level comments of one option by score
    async fn find_best_candidates(
        &self,
        topic_id: Snowflake,
        option_index: usize,
        limit: i64,
    ) -> RepoResult<Vec<Comment>>;

    /// Record one report per identity and blind the comment at the threshold
    async fn report(&self, id: Snowflake, reporter: &Identity) -> RepoResult<ReportOutcome>;

    /// Back to visible with a cleared report count
    async fn restore(&self, id: Snowflake) -> RepoResult<()>;

    /// Comments with at least one report, most reported first
    async fn find_reported(&self, limit: i64, offset: i64) -> RepoResult<Vec<Comment>>;

    /// An identity's comments, newest first
    async fn find_by_author(&self, author: &Identity, limit: i64) -> RepoResult<Vec<Comment>>;
}

// ============================================================================
// Reaction Repository
// ============================================================================

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// The identity's reactions among the given comments
    async fn find_for_reactor(
        &self,
        comment_ids: &[Snowflake],
        reactor: &Identity,
    ) -> RepoResult<Vec<Reaction>>;

    /// Toggle, switch, or add the identity's reaction and update the comment's
    /// counters and score in one transaction
    async fn react(
        &self,
        comment_id: Snowflake,
        reactor: &Identity,
        kind: ReactionKind,
    ) -> RepoResult<ReactionOutcome>;
}

// ============================================================================
// Anonymous Alias Repository
// ============================================================================

#[async_trait]
pub trait AnonymousAliasRepository: Send + Sync {
    /// Every alias assigned in a topic
    async fn find_by_topic(&self, topic_id: Snowflake) -> RepoResult<Vec<AnonymousAlias>>;

    /// Return the existing alias or assign the next free ordinal
    async fn assign(
        &self,
        topic_id: Snowflake,
        anonymous_id: AnonymousId,
    ) -> RepoResult<AnonymousAlias>;
}

// ============================================================================
// Notification Repository
// ============================================================================

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Create a notification
    async fn create(&self, notification: &Notification) -> RepoResult<()>;

    /// A user's notifications, newest first
    async fn find_by_receiver(
        &self,
        receiver_id: Snowflake,
        limit: i64,
        unread_only: bool,
    ) -> RepoResult<Vec<Notification>>;

    /// Number of unread notifications
    async fn unread_count(&self, receiver_id: Snowflake) -> RepoResult<i64>;

    /// Mark one notification read. Fails with not-found for other receivers.
    async fn mark_read(&self, id: Snowflake, receiver_id: Snowflake) -> RepoResult<()>;

    /// Mark everything read, returning how many changed
    async fn mark_all_read(&self, receiver_id: Snowflake) -> RepoResult<u64>;

    /// Delete one notification. Fails with not-found for other receivers.
    async fn delete(&self, id: Snowflake, receiver_id: Snowflake) -> RepoResult<()>;

    /// Delete all of a user's notifications, returning how many went
    async fn delete_all(&self, receiver_id: Snowflake) -> RepoResult<u64>;
}
