//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize`, and those carrying free-form
//! input also implement `Validate`.

use chrono::{DateTime, Utc};
use politalk_core::Snowflake;
use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Auth Requests
// ============================================================================

/// Email registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub password: String,

    #[validate(length(min = 2, max = 20, message = "Nickname must be 2-20 characters"))]
    pub nickname: String,
}

/// Email login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
}

/// Kakao login: the client's Kakao access token is exchanged for our tokens
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct KakaoLoginRequest {
    #[validate(length(min = 1, message = "Kakao access token is required"))]
    pub access_token: String,
}

/// Token refresh request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Logout request. Without a refresh token every session is revoked.
#[derive(Debug, Clone, Deserialize, Default, Validate)]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
}

// ============================================================================
// User Requests
// ============================================================================

/// Update own profile
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 20, message = "Nickname must be 2-20 characters"))]
    pub nickname: Option<String>,

    /// New avatar URL, or an empty string to remove it
    #[validate(length(max = 500, message = "Avatar URL must be at most 500 characters"))]
    pub avatar_url: Option<String>,
}

// ============================================================================
// Topic Requests
// ============================================================================

/// One option of a new topic. A blank label falls back to "Option N".
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct TopicOptionInput {
    #[validate(length(max = 100, message = "Option label must be at most 100 characters"))]
    #[serde(default)]
    pub label: Option<String>,

    pub image_url: Option<String>,
}

/// Create topic request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTopicRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Body must be at most 5000 characters"))]
    #[serde(default)]
    pub body: String,

    /// Category name, `other` when absent
    pub category: Option<String>,

    #[validate(nested)]
    pub options: Vec<TopicOptionInput>,

    #[serde(default)]
    pub image_urls: Vec<String>,

    pub thumbnail_url: Option<String>,

    /// Voting closes at this time
    pub deadline: Option<DateTime<Utc>>,
}

/// Topic listing query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopicListQuery {
    pub category: Option<String>,
    /// `latest` (default) or `popular`
    pub sort: Option<String>,
    pub page: Option<u32>,
}

/// Hot topic query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HotTopicsQuery {
    /// `day` (default), `week` or `month`
    pub window: Option<String>,
}

// ============================================================================
// Vote Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CastVoteRequest {
    pub option_index: usize,
}

// ============================================================================
// Comment Requests
// ============================================================================

/// Create comment request. Either `option_index` (top-level) or
/// `parent_id` (reply) must be present.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommentRequest {
    pub option_index: Option<usize>,

    pub parent_id: Option<Snowflake>,

    #[validate(length(min = 1, max = 1000, message = "Comment must be 1-1000 characters"))]
    pub body: String,

    #[serde(default)]
    pub image_urls: Vec<String>,
}

/// Comment listing query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentListQuery {
    /// Restrict to one option's thread
    pub option: Option<usize>,
    /// `latest` (default) or `score`
    pub sort: Option<String>,
    pub page: Option<u32>,
}

/// React with a name (`thumbs_up`) or the emoji itself
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReactRequest {
    #[validate(length(min = 1, message = "Reaction is required"))]
    pub reaction: String,
}

// ============================================================================
// Notification Requests
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationListQuery {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<i64>,
}

// ============================================================================
// Admin Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetPinnedRequest {
    pub pinned: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetRoleRequest {
    /// `user` or `admin`
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let request = RegisterRequest {
            email: "not-an-email".into(),
            password: "short".into(),
            nickname: "x".into(),
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("nickname"));
    }

    #[test]
    fn test_comment_request_parses_string_parent_id() {
        let request: CreateCommentRequest =
            serde_json::from_str(r#"{"parent_id":"12345","body":"agreed"}"#).unwrap();
        assert_eq!(request.parent_id, Some(Snowflake::new(12345)));
        assert!(request.option_index.is_none());
        assert!(request.image_urls.is_empty());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_empty_comment_rejected() {
        let request = CreateCommentRequest {
            option_index: Some(0),
            parent_id: None,
            body: String::new(),
            image_urls: Vec::new(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_topic_option_label_is_validated() {
        let request = CreateTopicRequest {
            title: "Four-day work week?".into(),
            body: String::new(),
            category: None,
            options: vec![
                TopicOptionInput {
                    label: Some("x".repeat(101)),
                    image_url: None,
                },
                TopicOptionInput::default(),
            ],
            image_urls: Vec::new(),
            thumbnail_url: None,
            deadline: None,
        };
        assert!(request.validate().is_err());
    }
}
