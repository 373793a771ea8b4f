//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod auth;
pub mod comment;
pub mod context;
pub mod directory;
pub mod error;
pub mod moderation;
pub mod notification;
pub mod reaction;
pub mod topic;
pub mod upload;
pub mod user;
pub mod vote;

// Re-export all services for convenience
pub use auth::AuthService;
pub use comment::CommentService;
pub use context::{Page, ServiceContext, ServiceContextBuilder, ServiceSettings};
pub use error::{ServiceError, ServiceResult};
pub use moderation::ModerationService;
pub use notification::NotificationService;
pub use reaction::ReactionService;
pub use topic::TopicService;
pub use upload::{ImageStore, UploadError, UploadService};
pub use user::UserService;
pub use vote::VoteService;
