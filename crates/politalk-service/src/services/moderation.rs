//! Moderation service
//!
//! Admin-only operations. Every method checks the caller's role first.

use chrono::Utc;
use politalk_core::entities::UserRole;
use politalk_core::events::{CommentModeratedEvent, TopicDeletedEvent, TopicPinnedEvent};
use politalk_core::{DomainError, DomainEvent, Snowflake};
use tracing::{info, instrument, warn};

use crate::dto::{CurrentUserResponse, ReportedCommentResponse, SetPinnedRequest, SetRoleRequest};

use super::comment::CommentService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Moderation service
pub struct ModerationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ModerationService<'a> {
    /// Create a new ModerationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    // === Topics ===

    #[instrument(skip(self, request), fields(pinned = request.pinned))]
    pub async fn set_pinned(
        &self,
        admin_id: Snowflake,
        topic_id: Snowflake,
        request: SetPinnedRequest,
    ) -> ServiceResult<()> {
        self.ctx.require_admin(admin_id).await?;

        self.ctx
            .topic_repo()
            .set_pinned(topic_id, request.pinned)
            .await?;

        info!(topic_id = %topic_id, "Topic pin changed");

        self.ctx
            .publish(DomainEvent::TopicPinned(TopicPinnedEvent {
                topic_id,
                pinned: request.pinned,
                timestamp: Utc::now(),
            }))
            .await;
        Ok(())
    }

    /// Delete a topic with everything under it
    #[instrument(skip(self))]
    pub async fn delete_topic(&self, admin_id: Snowflake, topic_id: Snowflake) -> ServiceResult<()> {
        self.ctx.require_admin(admin_id).await?;

        self.ctx.topic_repo().delete(topic_id).await?;

        warn!(topic_id = %topic_id, admin_id = %admin_id, "Topic deleted by admin");

        self.ctx
            .publish(DomainEvent::TopicDeleted(TopicDeletedEvent {
                topic_id,
                timestamp: Utc::now(),
            }))
            .await;
        Ok(())
    }

    // === Comments ===

    /// Comments with reports, most reported first
    #[instrument(skip(self))]
    pub async fn reported_comments(
        &self,
        admin_id: Snowflake,
        page: Option<u32>,
    ) -> ServiceResult<Vec<ReportedCommentResponse>> {
        self.ctx.require_admin(admin_id).await?;

        let page = self.ctx.settings().page(page);
        let comments = self
            .ctx
            .comment_repo()
            .find_reported(page.limit(), page.offset())
            .await?;

        Ok(comments.iter().map(ReportedCommentResponse::from).collect())
    }

    /// Make a comment visible again and clear its reports
    #[instrument(skip(self))]
    pub async fn restore_comment(
        &self,
        admin_id: Snowflake,
        comment_id: Snowflake,
    ) -> ServiceResult<()> {
        self.ctx.require_admin(admin_id).await?;

        let comment = CommentService::new(self.ctx)
            .require_comment(comment_id)
            .await?;
        self.ctx.comment_repo().restore(comment.id).await?;

        info!(comment_id = %comment.id, "Comment restored");

        self.ctx
            .publish(DomainEvent::CommentRestored(CommentModeratedEvent {
                topic_id: comment.topic_id,
                comment_id: comment.id,
                report_count: 0,
                timestamp: Utc::now(),
            }))
            .await;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_comment(
        &self,
        admin_id: Snowflake,
        comment_id: Snowflake,
    ) -> ServiceResult<()> {
        self.ctx.require_admin(admin_id).await?;

        let comments = CommentService::new(self.ctx);
        let comment = comments.require_comment(comment_id).await?;
        comments.remove(&comment).await?;

        warn!(comment_id = %comment.id, admin_id = %admin_id, "Comment deleted by admin");
        Ok(())
    }

    // === Users ===

    #[instrument(skip(self))]
    pub async fn list_users(
        &self,
        admin_id: Snowflake,
        page: Option<u32>,
    ) -> ServiceResult<Vec<CurrentUserResponse>> {
        self.ctx.require_admin(admin_id).await?;

        let page = self.ctx.settings().page(page);
        let users = self
            .ctx
            .user_repo()
            .list(page.limit(), page.offset())
            .await?;

        Ok(users.iter().map(CurrentUserResponse::from).collect())
    }

    /// Change a user's role. Admins cannot demote themselves.
    #[instrument(skip(self, request), fields(role = %request.role))]
    pub async fn set_role(
        &self,
        admin_id: Snowflake,
        user_id: Snowflake,
        request: SetRoleRequest,
    ) -> ServiceResult<CurrentUserResponse> {
        self.ctx.require_admin(admin_id).await?;

        let role = UserRole::parse(&request.role)
            .ok_or_else(|| ServiceError::validation(format!("Unknown role: {}", request.role)))?;
        if user_id == admin_id && role != UserRole::Admin {
            return Err(DomainError::CannotModifySelf.into());
        }

        let mut user = self.ctx.require_user(user_id).await?;
        self.ctx.user_repo().set_role(user.id, role).await?;
        user.set_role(role);

        info!(user_id = %user.id, role = role.as_str(), "Role changed");

        Ok(CurrentUserResponse::from(&user))
    }

    /// Delete an account and end its sessions
    #[instrument(skip(self))]
    pub async fn delete_user(&self, admin_id: Snowflake, user_id: Snowflake) -> ServiceResult<()> {
        self.ctx.require_admin(admin_id).await?;

        if user_id == admin_id {
            return Err(DomainError::CannotModifySelf.into());
        }

        self.ctx.user_repo().delete(user_id).await?;

        self.ctx
            .refresh_token_store()
            .revoke_all_for_user(user_id)
            .await
            .map_err(|e| ServiceError::internal(e.to_string()))?;

        warn!(user_id = %user_id, admin_id = %admin_id, "User deleted by admin");
        Ok(())
    }
}
