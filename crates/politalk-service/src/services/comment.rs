//! Comment service
//!
//! Posting is gated per option thread: a top-level comment in option `k`
//! requires the topic's authorship or an active vote for `k`. Replies are
//! open to everyone. Each identity may post once per cooldown window.

use std::collections::HashMap;

use chrono::Utc;
use politalk_cache::CooldownStatus;
use politalk_core::entities::{
    AnonymousAlias, Comment, Notification, NotificationKind, ReactionKind, Topic, MAX_COMMENT_IMAGES,
};
use politalk_core::events::{
    CommentCreatedEvent, CommentDeletedEvent, CommentModeratedEvent, NotificationCreatedEvent,
};
use politalk_core::policy::{gate, select_best, BEST_COMMENT_LIMIT};
use politalk_core::traits::{CommentQuery, CommentSort};
use politalk_core::{CommentTarget, DomainError, DomainEvent, Identity, Snowflake};
use tracing::{info, instrument, warn};

use crate::dto::{
    CommentListQuery, CommentResponse, CommentWithDetails, CreateCommentRequest,
    PaginatedResponse, ReportResponse,
};

use super::context::ServiceContext;
use super::directory::AuthorDirectory;
use super::error::{ServiceError, ServiceResult};
use super::topic::TopicService;

/// Comment service
pub struct CommentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommentService<'a> {
    /// Create a new CommentService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Load a comment or fail with `CommentNotFound`
    pub(crate) async fn require_comment(&self, comment_id: Snowflake) -> ServiceResult<Comment> {
        self.ctx
            .comment_repo()
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| DomainError::CommentNotFound(comment_id).into())
    }

    /// Post a top-level comment or a reply
    #[instrument(skip(self, request), fields(author = %author))]
    pub async fn create_comment(
        &self,
        topic_id: Snowflake,
        author: Identity,
        request: CreateCommentRequest,
    ) -> ServiceResult<CommentResponse> {
        if request.image_urls.len() > MAX_COMMENT_IMAGES {
            return Err(DomainError::TooManyImages {
                max: MAX_COMMENT_IMAGES,
            }
            .into());
        }

        let topic = TopicService::new(self.ctx).require_topic(topic_id).await?;

        let parent = match request.parent_id {
            Some(parent_id) => {
                let parent = self.require_comment(parent_id).await?;
                if parent.topic_id != topic.id || parent.is_reply() {
                    return Err(DomainError::InvalidReplyTarget.into());
                }
                Some(parent)
            }
            None => None,
        };

        let target = match (&parent, request.option_index) {
            (Some(_), _) => CommentTarget::Reply,
            (None, Some(option_index)) => {
                if !topic.has_option(option_index) {
                    return Err(DomainError::UnknownOption(option_index).into());
                }
                CommentTarget::Option(option_index)
            }
            (None, None) => {
                return Err(ServiceError::validation(
                    "option_index or parent_id is required",
                ));
            }
        };

        let vote = self.ctx.vote_repo().find(topic.id, &author).await?;
        gate::ensure_can_comment(&author, &topic, vote.as_ref(), target)?;

        // The vote is re-checked inside the insert so a concurrent cancel
        // cannot leave a comment behind without its vote.
        let requires_vote = match target {
            CommentTarget::Option(option_index) if !topic.is_author(&author) => Some(option_index),
            _ => None,
        };

        let id = self.ctx.generate_id();
        let mut comment = match (&parent, target) {
            (Some(parent), _) => Comment::new_reply(id, parent, author, request.body),
            (None, CommentTarget::Option(option_index)) => {
                Comment::new(id, topic.id, option_index, author, request.body)
            }
            (None, CommentTarget::Reply) => return Err(DomainError::InvalidReplyTarget.into()),
        };
        comment.image_urls = request.image_urls;

        self.start_cooldown(&author).await?;

        let receipt = match self.ctx.comment_repo().create(&comment, requires_vote).await {
            Ok(receipt) => receipt,
            Err(e) => {
                // let the author retry right away
                self.ctx.comment_cooldown().release(&author).await.ok();
                return Err(e.into());
            }
        };
        comment.created_at = receipt.created_at;
        if let Some(alias) = &receipt.alias {
            info!(ordinal = alias.ordinal, "Anonymous alias in use");
        }

        info!(
            topic_id = %topic.id,
            comment_id = %comment.id,
            option_index = comment.option_index,
            reply = comment.is_reply(),
            "Comment created"
        );

        self.ctx
            .publish(DomainEvent::CommentCreated(CommentCreatedEvent {
                topic_id: topic.id,
                comment_id: comment.id,
                option_index: comment.option_index,
                parent_id: comment.parent_id,
                timestamp: comment.created_at,
            }))
            .await;

        self.notify(&topic, parent.as_ref(), &comment).await;

        // The comment is stored: from here on nothing may fail the request
        let directory = self.fresh_author_directory(&topic, &author, receipt.alias).await;
        Ok(CommentResponse::from(CommentWithDetails {
            author: directory.author(&author),
            my_reaction: None,
            comment,
            replies: Vec::new(),
        }))
    }

    /// Names for a just-posted comment
    async fn fresh_author_directory(
        &self,
        topic: &Topic,
        author: &Identity,
        alias: Option<AnonymousAlias>,
    ) -> AuthorDirectory {
        let member_lookup = match author.member_id() {
            Some(user_id) => self.ctx.user_repo().find_by_id(user_id).await,
            None => Ok(None),
        };
        AuthorDirectory::for_posted(topic, member_lookup, alias)
    }

    async fn start_cooldown(&self, author: &Identity) -> ServiceResult<()> {
        let status = self
            .ctx
            .comment_cooldown()
            .acquire(author)
            .await
            .map_err(|e| ServiceError::internal(e.to_string()))?;

        match status {
            CooldownStatus::Ready => Ok(()),
            CooldownStatus::Cooling { retry_after_secs } => {
                warn!(retry_after_secs, "Comment refused during cooldown");
                Err(ServiceError::RateLimited { retry_after_secs })
            }
        }
    }

    /// Tell the topic author about a comment, or the parent's author about a
    /// reply. Failures are logged; the comment is already stored.
    async fn notify(&self, topic: &Topic, parent: Option<&Comment>, comment: &Comment) {
        let (receiver, kind) = match parent {
            Some(parent) => (Some(parent.author), NotificationKind::Reply),
            None => (topic.author, NotificationKind::Comment),
        };

        let Some(notification) = Notification::for_recipient(
            self.ctx.generate_id(),
            receiver,
            comment.author,
            topic.id,
            comment.id,
            kind,
        ) else {
            return;
        };

        if let Err(e) = self.ctx.notification_repo().create(&notification).await {
            warn!(error = %e, comment_id = %comment.id, "Failed to store notification");
            return;
        }

        self.ctx
            .publish(DomainEvent::NotificationCreated(NotificationCreatedEvent {
                notification_id: notification.id,
                receiver_id: notification.receiver_id,
                sender: notification.sender,
                topic_id: notification.topic_id,
                kind: notification.kind.as_str().to_string(),
                timestamp: notification.created_at,
            }))
            .await;
    }

    /// Top-level comments with their replies, one page at a time
    #[instrument(skip(self, viewer))]
    pub async fn list_comments(
        &self,
        topic_id: Snowflake,
        viewer: Option<&Identity>,
        query: CommentListQuery,
    ) -> ServiceResult<PaginatedResponse<CommentResponse>> {
        let topic = TopicService::new(self.ctx).require_topic(topic_id).await?;
        if let Some(option_index) = query.option {
            if !topic.has_option(option_index) {
                return Err(DomainError::UnknownOption(option_index).into());
            }
        }
        let sort = match query.sort.as_deref() {
            None | Some("latest") => CommentSort::Latest,
            Some("score") => CommentSort::Score,
            Some(other) => {
                return Err(ServiceError::validation(format!("Unknown sort: {other}")));
            }
        };
        let page = self.ctx.settings().page(query.page);

        let comments = self
            .ctx
            .comment_repo()
            .list(&CommentQuery {
                topic_id: topic.id,
                option_index: query.option,
                sort,
                limit: page.limit(),
                offset: page.offset(),
            })
            .await?;
        let total = self.ctx.comment_repo().count(topic.id, query.option).await?;

        let parent_ids: Vec<Snowflake> = comments.iter().map(|c| c.id).collect();
        let replies = if parent_ids.is_empty() {
            Vec::new()
        } else {
            self.ctx.comment_repo().find_replies(&parent_ids).await?
        };

        let data = self.render(&topic, viewer, comments, replies).await?;
        Ok(PaginatedResponse::new(data, page.number, page.size, total))
    }

    /// The highest scoring visible comments of one option
    #[instrument(skip(self, viewer))]
    pub async fn best_comments(
        &self,
        topic_id: Snowflake,
        option_index: usize,
        viewer: Option<&Identity>,
    ) -> ServiceResult<Vec<CommentResponse>> {
        let topic = TopicService::new(self.ctx).require_topic(topic_id).await?;
        if !topic.has_option(option_index) {
            return Err(DomainError::UnknownOption(option_index).into());
        }

        let candidates = self
            .ctx
            .comment_repo()
            .find_best_candidates(topic.id, option_index, BEST_COMMENT_LIMIT as i64)
            .await?;
        let best = select_best(candidates, BEST_COMMENT_LIMIT);

        self.render(&topic, viewer, best, Vec::new()).await
    }

    /// Delete a comment and its replies. Authors delete their own, admins any.
    #[instrument(skip(self), fields(actor = %actor))]
    pub async fn delete_comment(&self, comment_id: Snowflake, actor: &Identity) -> ServiceResult<()> {
        let comment = self.require_comment(comment_id).await?;

        let is_admin = !comment.is_authored_by(actor) && self.ctx.is_admin(actor).await?;
        if !gate::can_delete(actor, &comment, is_admin) {
            return Err(DomainError::NotCommentAuthor.into());
        }

        self.remove(&comment).await?;

        info!(comment_id = %comment.id, by_admin = is_admin, "Comment deleted");
        Ok(())
    }

    pub(crate) async fn remove(&self, comment: &Comment) -> ServiceResult<()> {
        self.ctx.comment_repo().delete(comment.id).await?;

        self.ctx
            .publish(DomainEvent::CommentDeleted(CommentDeletedEvent {
                topic_id: comment.topic_id,
                comment_id: comment.id,
                timestamp: Utc::now(),
            }))
            .await;
        Ok(())
    }

    /// Report a comment, once per identity. The fifth report blinds it.
    #[instrument(skip(self), fields(reporter = %reporter))]
    pub async fn report_comment(
        &self,
        comment_id: Snowflake,
        reporter: &Identity,
    ) -> ServiceResult<ReportResponse> {
        let comment = self.require_comment(comment_id).await?;
        let outcome = self.ctx.comment_repo().report(comment.id, reporter).await?;

        info!(
            comment_id = %comment.id,
            report_count = outcome.report_count,
            "Comment reported"
        );

        if outcome.newly_blinded {
            warn!(comment_id = %comment.id, "Comment blinded after reports");
            self.ctx
                .publish(DomainEvent::CommentBlinded(CommentModeratedEvent {
                    topic_id: comment.topic_id,
                    comment_id: comment.id,
                    report_count: outcome.report_count,
                    timestamp: Utc::now(),
                }))
                .await;
        }

        Ok(ReportResponse {
            report_count: outcome.report_count,
            visibility: Some(outcome.visibility.as_str().to_string()),
        })
    }

    /// Attach author names, the viewer's reactions, and replies
    async fn render(
        &self,
        topic: &Topic,
        viewer: Option<&Identity>,
        comments: Vec<Comment>,
        replies: Vec<Comment>,
    ) -> ServiceResult<Vec<CommentResponse>> {
        let everything: Vec<Comment> = comments.iter().chain(&replies).cloned().collect();
        let directory = AuthorDirectory::load(self.ctx, topic, &everything).await?;

        let my_reactions: HashMap<Snowflake, ReactionKind> = match viewer {
            Some(identity) if !everything.is_empty() => {
                let ids: Vec<Snowflake> = everything.iter().map(|c| c.id).collect();
                self.ctx
                    .reaction_repo()
                    .find_for_reactor(&ids, identity)
                    .await?
                    .into_iter()
                    .map(|reaction| (reaction.comment_id, reaction.kind))
                    .collect()
            }
            _ => HashMap::new(),
        };

        let details = |comment: Comment, replies: Vec<CommentResponse>| {
            CommentResponse::from(CommentWithDetails {
                author: directory.author(&comment.author),
                my_reaction: my_reactions.get(&comment.id).copied(),
                comment,
                replies,
            })
        };

        let mut replies_by_parent: HashMap<Snowflake, Vec<CommentResponse>> = HashMap::new();
        for reply in replies {
            if let Some(parent_id) = reply.parent_id {
                replies_by_parent
                    .entry(parent_id)
                    .or_default()
                    .push(details(reply, Vec::new()));
            }
        }

        Ok(comments
            .into_iter()
            .map(|comment| {
                let replies = replies_by_parent.remove(&comment.id).unwrap_or_default();
                details(comment, replies)
            })
            .collect())
    }
}
