//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use chrono::Utc;
use politalk_core::entities::{
    Comment, Notification, ReactionKind, ReactionTally, Topic, TopicWithActivity, User,
    VoteRecord,
};

use super::responses::{
    AuthorResponse, CommentResponse, CurrentUserResponse, MyCommentResponse,
    NotificationResponse, ReactionCountsResponse, ReportedCommentResponse, TopicOptionResponse,
    TopicResponse, TopicSummaryResponse, UserResponse, VoteResponse,
};

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            nickname: user.nickname.clone(),
            avatar_url: user.avatar_url.clone(),
            created_at: user.created_at,
        }
    }
}

impl From<&User> for CurrentUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            nickname: user.nickname.clone(),
            email: user.email.clone(),
            avatar_url: user.avatar_url.clone(),
            role: user.role.as_str().to_string(),
            provider: user.provider.as_str().to_string(),
            created_at: user.created_at,
        }
    }
}

impl From<User> for CurrentUserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

// ============================================================================
// Topic Mappers
// ============================================================================

/// A topic as seen by one caller
pub struct TopicForViewer<'a> {
    pub topic: &'a Topic,
    pub my_vote: Option<usize>,
    pub is_author: bool,
}

impl From<TopicForViewer<'_>> for TopicResponse {
    fn from(view: TopicForViewer<'_>) -> Self {
        let topic = view.topic;
        let options = topic
            .options
            .iter()
            .zip(topic.vote_percentages())
            .enumerate()
            .map(|(index, (option, percentage))| TopicOptionResponse {
                index,
                label: option.label.clone(),
                image_url: option.image_url.clone(),
                vote_count: option.vote_count,
                percentage,
            })
            .collect();

        Self {
            id: topic.id.to_string(),
            title: topic.title.clone(),
            body: topic.body.clone(),
            category: topic.category.as_str().to_string(),
            options,
            total_votes: topic.total_votes(),
            image_urls: topic.image_urls.clone(),
            thumbnail_url: topic.thumbnail_url.clone(),
            pinned: topic.pinned,
            view_count: topic.view_count,
            created_at: topic.created_at,
            deadline: topic.deadline,
            closed: topic.is_closed(Utc::now()),
            my_vote: view.my_vote,
            is_author: view.is_author,
        }
    }
}

impl From<&TopicWithActivity> for TopicSummaryResponse {
    fn from(activity: &TopicWithActivity) -> Self {
        let topic = &activity.topic;
        Self {
            id: topic.id.to_string(),
            title: topic.title.clone(),
            category: topic.category.as_str().to_string(),
            thumbnail_url: topic.thumbnail_url.clone(),
            pinned: topic.pinned,
            view_count: topic.view_count,
            comment_count: activity.comment_count,
            total_votes: topic.total_votes(),
            created_at: topic.created_at,
        }
    }
}

// ============================================================================
// Vote Mappers
// ============================================================================

impl From<&VoteRecord> for VoteResponse {
    fn from(vote: &VoteRecord) -> Self {
        Self {
            topic_id: vote.topic_id.to_string(),
            option_index: vote.option_index,
            voted_at: vote.voted_at,
        }
    }
}

// ============================================================================
// Comment Mappers
// ============================================================================

impl From<ReactionTally> for ReactionCountsResponse {
    fn from(tally: ReactionTally) -> Self {
        Self {
            thumbs_up: tally.thumbs_up,
            thumbs_down: tally.thumbs_down,
            sad: tally.sad,
            angry: tally.angry,
            strong: tally.strong,
        }
    }
}

/// A comment with everything needed to render it
pub struct CommentWithDetails {
    pub comment: Comment,
    pub author: AuthorResponse,
    pub my_reaction: Option<ReactionKind>,
    pub replies: Vec<CommentResponse>,
}

impl From<CommentWithDetails> for CommentResponse {
    fn from(details: CommentWithDetails) -> Self {
        let comment = details.comment;
        let blinded = comment.is_blinded();
        let (body, image_urls) = if blinded {
            (None, Vec::new())
        } else {
            (Some(comment.body.clone()), comment.image_urls.clone())
        };

        Self {
            id: comment.id.to_string(),
            topic_id: comment.topic_id.to_string(),
            option_index: comment.option_index,
            parent_id: comment.parent_id.map(|id| id.to_string()),
            author: details.author,
            body,
            image_urls,
            reactions: comment.reactions.into(),
            score: comment.score(),
            my_reaction: details.my_reaction.map(|kind| kind.as_str().to_string()),
            blinded,
            created_at: comment.created_at,
            replies: details.replies,
        }
    }
}

/// A comment of the caller with the title of its topic
pub struct CommentWithTopicTitle<'a> {
    pub comment: &'a Comment,
    pub topic_title: String,
}

impl From<CommentWithTopicTitle<'_>> for MyCommentResponse {
    fn from(item: CommentWithTopicTitle<'_>) -> Self {
        let comment = item.comment;
        Self {
            id: comment.id.to_string(),
            topic_id: comment.topic_id.to_string(),
            topic_title: item.topic_title,
            option_index: comment.option_index,
            parent_id: comment.parent_id.map(|id| id.to_string()),
            body: comment.body.clone(),
            score: comment.score(),
            blinded: comment.is_blinded(),
            created_at: comment.created_at,
        }
    }
}

impl From<&Comment> for ReportedCommentResponse {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id.to_string(),
            topic_id: comment.topic_id.to_string(),
            option_index: comment.option_index,
            author_key: comment.author.key(),
            body: comment.body.clone(),
            report_count: comment.report_count,
            visibility: comment.visibility.as_str().to_string(),
            created_at: comment.created_at,
        }
    }
}

// ============================================================================
// Notification Mappers
// ============================================================================

pub struct NotificationWithSender {
    pub notification: Notification,
    pub sender_name: String,
}

impl From<NotificationWithSender> for NotificationResponse {
    fn from(item: NotificationWithSender) -> Self {
        let notification = item.notification;
        Self {
            id: notification.id.to_string(),
            kind: notification.kind.as_str().to_string(),
            sender_name: item.sender_name,
            topic_id: notification.topic_id.to_string(),
            comment_id: notification.comment_id.map(|id| id.to_string()),
            read: notification.read,
            created_at: notification.created_at,
        }
    }
}
