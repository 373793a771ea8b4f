//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

// Re-export commonly used request types
pub use requests::{
    CastVoteRequest, CommentListQuery, CreateCommentRequest, CreateTopicRequest, HotTopicsQuery,
    KakaoLoginRequest, LoginRequest, LogoutRequest, NotificationListQuery, ReactRequest,
    RefreshTokenRequest, RegisterRequest, SetPinnedRequest, SetRoleRequest, TopicListQuery,
    TopicOptionInput, UpdateProfileRequest,
};

// Re-export commonly used response types
pub use responses::{
    AnonymousTokenResponse, ApiResponse, AuthResponse, AuthorResponse,
    ClearedNotificationsResponse, CommentResponse, CurrentUserResponse, HealthChecks,
    HealthResponse, MarkedReadResponse, MyCommentResponse, NotificationListResponse,
    NotificationResponse, PaginatedResponse, PaginationMeta, ReactionCountsResponse,
    ReactionResponse, ReadinessResponse, ReportResponse, ReportedCommentResponse,
    TopicOptionResponse, TopicResponse, TopicSummaryResponse, UploadResponse, UserResponse,
    ViewCountResponse, VoteHistoryResponse, VoteResponse,
};

// Re-export mappers and helper structs
pub use mappers::{CommentWithDetails, CommentWithTopicTitle, NotificationWithSender, TopicForViewer};
