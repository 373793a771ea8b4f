//! # politalk-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

pub use services::{
    AuthService, CommentService, ImageStore, ModerationService, NotificationService,
    ReactionService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
    ServiceSettings, TopicService, UploadError, UploadService, UserService, VoteService,
};
