//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("Topic not found: {0}")]
    TopicNotFound(Snowflake),

    #[error("Comment not found: {0}")]
    CommentNotFound(Snowflake),

    #[error("Notification not found: {0}")]
    NotificationNotFound(Snowflake),

    #[error("No active vote on this topic")]
    NoActiveVote,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid nickname: {0}")]
    InvalidNickname(String),

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("Topic has no option {0}")]
    UnknownOption(usize),

    #[error("A topic needs between {min} and {max} options")]
    InvalidOptionCount { min: usize, max: usize },

    #[error("Too many images: max {max}")]
    TooManyImages { max: usize },

    #[error("Replies can only target a top-level comment on the same topic")]
    InvalidReplyTarget,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Vote for option {option_index} to join its thread")]
    VoteRequired { option_index: usize },

    #[error("Not comment author")]
    NotCommentAuthor,

    #[error("Admin role required")]
    AdminRequired,

    #[error("Sign in required")]
    MemberRequired,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Email already in use")]
    EmailAlreadyExists,

    #[error("Nickname already in use")]
    NicknameTaken,

    #[error("Already voted on this topic")]
    AlreadyVoted,

    #[error("Already reported")]
    AlreadyReported,

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("cannot cancel: comment already posted")]
    CommentAlreadyPosted,

    #[error("Voting on this topic has closed")]
    VotingClosed,

    #[error("Admins cannot delete or demote themselves")]
    CannotModifySelf,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::TopicNotFound(_) => "UNKNOWN_TOPIC",
            Self::CommentNotFound(_) => "UNKNOWN_COMMENT",
            Self::NotificationNotFound(_) => "UNKNOWN_NOTIFICATION",
            Self::NoActiveVote => "NO_ACTIVE_VOTE",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidNickname(_) => "INVALID_NICKNAME",
            Self::WeakPassword(_) => "WEAK_PASSWORD",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::UnknownOption(_) => "UNKNOWN_OPTION",
            Self::InvalidOptionCount { .. } => "INVALID_OPTION_COUNT",
            Self::TooManyImages { .. } => "TOO_MANY_IMAGES",
            Self::InvalidReplyTarget => "INVALID_REPLY_TARGET",

            // Authorization
            Self::VoteRequired { .. } => "VOTE_REQUIRED",
            Self::NotCommentAuthor => "NOT_COMMENT_AUTHOR",
            Self::AdminRequired => "ADMIN_REQUIRED",
            Self::MemberRequired => "MEMBER_REQUIRED",

            // Conflict
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::NicknameTaken => "NICKNAME_TAKEN",
            Self::AlreadyVoted => "ALREADY_VOTED",
            Self::AlreadyReported => "ALREADY_REPORTED",

            // Business Rules
            Self::CommentAlreadyPosted => "COMMENT_ALREADY_POSTED",
            Self::VotingClosed => "VOTING_CLOSED",
            Self::CannotModifySelf => "CANNOT_MODIFY_SELF",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::TopicNotFound(_)
                | Self::CommentNotFound(_)
                | Self::NotificationNotFound(_)
                | Self::NoActiveVote
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidEmail
                | Self::InvalidNickname(_)
                | Self::WeakPassword(_)
                | Self::ContentTooLong { .. }
                | Self::UnknownOption(_)
                | Self::InvalidOptionCount { .. }
                | Self::TooManyImages { .. }
                | Self::InvalidReplyTarget
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::VoteRequired { .. }
                | Self::NotCommentAuthor
                | Self::AdminRequired
                | Self::MemberRequired
        )
    }

    /// Check if this is a conflict error. Business rule violations surface as
    /// conflicts with the current state.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::EmailAlreadyExists
                | Self::NicknameTaken
                | Self::AlreadyVoted
                | Self::AlreadyReported
                | Self::CommentAlreadyPosted
                | Self::VotingClosed
                | Self::CannotModifySelf
        )
    }
}
