//! Test fixtures and data generators
//!
//! Provides reusable request bodies and typed views of API responses.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data, stable across parallel test binaries
pub fn unique_suffix() -> u64 {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    (millis % 10_000_000) * 100 + COUNTER.fetch_add(1, Ordering::SeqCst) % 100
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub nickname: String,
}

impl RegisterRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            email: format!("test{suffix}@example.com"),
            password: "TestPass123!".to_string(),
            nickname: format!("user{suffix}"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn from_register(reg: &RegisterRequest) -> Self {
        Self {
            email: reg.email.clone(),
            password: reg.password.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Default)]
pub struct OptionInput {
    pub label: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateTopicRequest {
    pub title: String,
    pub body: String,
    pub category: Option<String>,
    pub options: Vec<OptionInput>,
}

impl CreateTopicRequest {
    pub fn with_options(labels: &[&str]) -> Self {
        Self {
            title: format!("Topic {}", unique_suffix()),
            body: "What do you think?".to_string(),
            category: Some("politics".to_string()),
            options: labels
                .iter()
                .map(|label| OptionInput {
                    label: Some((*label).to_string()),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CastVoteRequest {
    pub option_index: usize,
}

#[derive(Debug, Serialize)]
pub struct CreateCommentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub body: String,
}

impl CreateCommentRequest {
    pub fn on_option(option_index: usize, body: &str) -> Self {
        Self {
            option_index: Some(option_index),
            parent_id: None,
            body: body.to_string(),
        }
    }

    pub fn reply_to(parent_id: &str, body: &str) -> Self {
        Self {
            option_index: None,
            parent_id: Some(parent_id.to_string()),
            body: body.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReactRequest {
    pub reaction: String,
}

impl ReactRequest {
    pub fn new(reaction: &str) -> Self {
        Self {
            reaction: reaction.to_string(),
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub nickname: String,
    pub email: Option<String>,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct AnonymousTokenResponse {
    pub anonymous_id: String,
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct TopicOptionResponse {
    pub index: usize,
    pub label: String,
    pub vote_count: i64,
    pub percentage: u32,
}

#[derive(Debug, Deserialize)]
pub struct TopicResponse {
    pub id: String,
    pub title: String,
    pub options: Vec<TopicOptionResponse>,
    pub total_votes: i64,
    pub pinned: bool,
    pub my_vote: Option<usize>,
    pub is_author: bool,
}

#[derive(Debug, Deserialize)]
pub struct TopicSummaryResponse {
    pub id: String,
    pub title: String,
    pub comment_count: i64,
    pub total_votes: i64,
}

#[derive(Debug, Deserialize)]
pub struct AuthorResponse {
    pub name: String,
    pub anonymous: bool,
    pub is_topic_author: bool,
}

#[derive(Debug, Deserialize)]
pub struct ReactionCounts {
    pub thumbs_up: i64,
    pub thumbs_down: i64,
    pub sad: i64,
    pub angry: i64,
    pub strong: i64,
}

#[derive(Debug, Deserialize)]
pub struct CommentResponse {
    pub id: String,
    pub option_index: usize,
    pub parent_id: Option<String>,
    pub author: AuthorResponse,
    pub body: Option<String>,
    pub reactions: ReactionCounts,
    pub score: i64,
    pub blinded: bool,
    #[serde(default)]
    pub replies: Vec<CommentResponse>,
}

#[derive(Debug, Deserialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub total: i64,
    pub has_more: bool,
}

#[derive(Debug, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Deserialize)]
pub struct ReactionResponse {
    pub reaction: Option<String>,
    pub reactions: ReactionCounts,
    pub score: i64,
}

#[derive(Debug, Deserialize)]
pub struct ReportResponse {
    pub report_count: i32,
    pub visibility: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NotificationResponse {
    pub id: String,
    pub kind: String,
    pub sender_name: String,
    pub read: bool,
}

#[derive(Debug, Deserialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<NotificationResponse>,
    pub unread_count: i64,
}

#[derive(Debug, Deserialize)]
pub struct ClearedNotificationsResponse {
    pub deleted: u64,
}

#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}
