//! User service
//!
//! Profiles, the caller's own history and account deletion.

use std::collections::HashMap;

use politalk_core::{DomainError, Identity, Snowflake};
use tracing::{info, instrument, warn};

use crate::dto::{
    CommentWithTopicTitle, CurrentUserResponse, MyCommentResponse, TopicSummaryResponse,
    UpdateProfileRequest, UserResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Most entries returned by history endpoints
pub const HISTORY_LIMIT: i64 = 100;

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    /// Create a new UserService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Get the signed-in user's own profile
    #[instrument(skip(self))]
    pub async fn get_current_user(&self, user_id: Snowflake) -> ServiceResult<CurrentUserResponse> {
        let user = self.ctx.require_user(user_id).await?;
        Ok(CurrentUserResponse::from(&user))
    }

    /// Get a public profile
    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: Snowflake) -> ServiceResult<UserResponse> {
        let user = self.ctx.require_user(user_id).await?;
        Ok(UserResponse::from(&user))
    }

    /// Change nickname and avatar. Nicknames are unique regardless of case.
    #[instrument(skip(self, request))]
    pub async fn update_current_user(
        &self,
        user_id: Snowflake,
        request: UpdateProfileRequest,
    ) -> ServiceResult<CurrentUserResponse> {
        let mut user = self.ctx.require_user(user_id).await?;

        if let Some(nickname) = request.nickname {
            let nickname = nickname.trim().to_string();
            if nickname.chars().count() < 2 {
                return Err(DomainError::InvalidNickname("too short".into()).into());
            }
            if !nickname.eq_ignore_ascii_case(&user.nickname)
                && self.ctx.user_repo().nickname_exists(&nickname).await?
            {
                return Err(DomainError::NicknameTaken.into());
            }
            user.set_nickname(nickname);
        }

        if let Some(avatar_url) = request.avatar_url {
            user.set_avatar(Some(avatar_url).filter(|url| !url.trim().is_empty()));
        }

        self.ctx.user_repo().update(&user).await?;

        info!(user_id = %user.id, "Profile updated");

        Ok(CurrentUserResponse::from(&user))
    }

    /// The caller's comments, newest first
    #[instrument(skip(self), fields(identity = %identity))]
    pub async fn my_comments(&self, identity: &Identity) -> ServiceResult<Vec<MyCommentResponse>> {
        let comments = self
            .ctx
            .comment_repo()
            .find_by_author(identity, HISTORY_LIMIT)
            .await?;

        let mut topic_ids: Vec<Snowflake> = comments.iter().map(|c| c.topic_id).collect();
        topic_ids.sort_unstable();
        topic_ids.dedup();

        let titles: HashMap<Snowflake, String> = self
            .ctx
            .topic_repo()
            .find_by_ids(&topic_ids)
            .await?
            .into_iter()
            .map(|topic| (topic.id, topic.title))
            .collect();

        Ok(comments
            .iter()
            .map(|comment| {
                MyCommentResponse::from(CommentWithTopicTitle {
                    comment,
                    topic_title: titles.get(&comment.topic_id).cloned().unwrap_or_default(),
                })
            })
            .collect())
    }

    /// Topics the caller started, newest first
    #[instrument(skip(self), fields(identity = %identity))]
    pub async fn my_topics(&self, identity: &Identity) -> ServiceResult<Vec<TopicSummaryResponse>> {
        let topics = self
            .ctx
            .topic_repo()
            .find_by_author(identity, HISTORY_LIMIT)
            .await?;

        Ok(topics.iter().map(TopicSummaryResponse::from).collect())
    }

    /// Delete the caller's account along with their topics and comments,
    /// then end every session
    #[instrument(skip(self))]
    pub async fn delete_current_user(&self, user_id: Snowflake) -> ServiceResult<()> {
        let purge = self.ctx.user_repo().delete_account(user_id).await?;

        self.ctx
            .refresh_token_store()
            .revoke_all_for_user(user_id)
            .await
            .map_err(|e| ServiceError::internal(e.to_string()))?;

        warn!(
            user_id = %user_id,
            topics = purge.topics,
            comments = purge.comments,
            "Account deleted by owner"
        );
        Ok(())
    }
}
