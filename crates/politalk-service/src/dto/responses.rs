//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// Common Response Types
// ============================================================================

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Page of results with offset pagination
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    /// `page` is 1-based
    pub fn new(data: Vec<T>, page: u32, page_size: u32, total: i64) -> Self {
        let seen = i64::from(page.saturating_sub(1)) * i64::from(page_size) + data.len() as i64;
        Self {
            data,
            pagination: PaginationMeta {
                page,
                page_size,
                total,
                has_more: seen < total,
            },
        }
    }
}

/// Pagination metadata
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total: i64,
    /// Whether more results exist after this page
    pub has_more: bool,
}

// ============================================================================
// Auth Responses
// ============================================================================

/// Authentication response with tokens
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: CurrentUserResponse,
}

impl AuthResponse {
    pub fn new(
        access_token: String,
        refresh_token: String,
        expires_in: i64,
        user: CurrentUserResponse,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in,
            user,
        }
    }
}

/// A fresh anonymous identity and the token that proves it
#[derive(Debug, Serialize)]
pub struct AnonymousTokenResponse {
    pub anonymous_id: String,
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

// ============================================================================
// User Responses
// ============================================================================

/// Public profile
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub nickname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Own profile (also the admin view of a user)
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUserResponse {
    pub id: String,
    pub nickname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub role: String,
    pub provider: String,
    pub created_at: DateTime<Utc>,
}

/// How a comment author is shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorResponse {
    /// Nickname for members, `AnonymousN` for anonymous authors
    pub name: String,
    pub anonymous: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// The author also wrote the topic
    pub is_topic_author: bool,
}

// ============================================================================
// Topic Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct TopicOptionResponse {
    pub index: usize,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub vote_count: i64,
    /// Rounded share of all votes
    pub percentage: u32,
}

/// Full topic with tallies
#[derive(Debug, Clone, Serialize)]
pub struct TopicResponse {
    pub id: String,
    pub title: String,
    pub body: String,
    pub category: String,
    pub options: Vec<TopicOptionResponse>,
    pub total_votes: i64,
    pub image_urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub pinned: bool,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    pub closed: bool,
    /// Option the caller voted for
    pub my_vote: Option<usize>,
    /// Whether the caller wrote the topic
    pub is_author: bool,
}

/// Topic row in listings
#[derive(Debug, Clone, Serialize)]
pub struct TopicSummaryResponse {
    pub id: String,
    pub title: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub pinned: bool,
    pub view_count: i64,
    pub comment_count: i64,
    pub total_votes: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewCountResponse {
    pub view_count: i64,
}

/// Result of reporting a topic or a comment
#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
    pub report_count: i32,
    /// Comment visibility after the report, absent for topics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
}

// ============================================================================
// Vote Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct VoteResponse {
    pub topic_id: String,
    pub option_index: usize,
    pub voted_at: DateTime<Utc>,
}

/// One entry in the caller's vote history
#[derive(Debug, Clone, Serialize)]
pub struct VoteHistoryResponse {
    pub topic_id: String,
    pub topic_title: String,
    pub option_index: usize,
    pub option_label: String,
    pub voted_at: DateTime<Utc>,
}

// ============================================================================
// Comment Responses
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReactionCountsResponse {
    pub thumbs_up: i64,
    pub thumbs_down: i64,
    pub sad: i64,
    pub angry: i64,
    pub strong: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: String,
    pub topic_id: String,
    pub option_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub author: AuthorResponse,
    /// Withheld while the comment is blinded
    pub body: Option<String>,
    pub image_urls: Vec<String>,
    pub reactions: ReactionCountsResponse,
    pub score: i64,
    /// The caller's reaction, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_reaction: Option<String>,
    pub blinded: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub replies: Vec<CommentResponse>,
}

/// One of the caller's own comments
#[derive(Debug, Clone, Serialize)]
pub struct MyCommentResponse {
    pub id: String,
    pub topic_id: String,
    pub topic_title: String,
    pub option_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub body: String,
    pub score: i64,
    pub blinded: bool,
    pub created_at: DateTime<Utc>,
}

/// Comment state after a reaction
#[derive(Debug, Clone, Serialize)]
pub struct ReactionResponse {
    pub comment_id: String,
    /// The caller's reaction after the change, absent when it was removed
    pub reaction: Option<String>,
    pub reactions: ReactionCountsResponse,
    pub score: i64,
}

/// Admin view of a reported comment, body included
#[derive(Debug, Clone, Serialize)]
pub struct ReportedCommentResponse {
    pub id: String,
    pub topic_id: String,
    pub option_index: usize,
    pub author_key: String,
    pub body: String,
    pub report_count: i32,
    pub visibility: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Notification Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct NotificationResponse {
    pub id: String,
    pub kind: String,
    pub sender_name: String,
    pub topic_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<NotificationResponse>,
    pub unread_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkedReadResponse {
    pub updated: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClearedNotificationsResponse {
    pub deleted: u64,
}

// ============================================================================
// Upload Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each service
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    pub redis: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool, redis_healthy: bool) -> Self {
        let all_healthy = database_healthy && redis_healthy;
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
                redis: if redis_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
