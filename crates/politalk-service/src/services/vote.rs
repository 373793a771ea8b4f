//! Vote service
//!
//! One reversible vote per identity and topic. Tallies change in the same
//! transaction as the vote record; this service checks the ledger rules,
//! reports the new tallies, and publishes the change.

use std::collections::HashMap;

use chrono::Utc;
use politalk_core::entities::VoteRecord;
use politalk_core::events::VoteChangedEvent;
use politalk_core::policy::ledger;
use politalk_core::{DomainEvent, Identity, Snowflake, Topic};
use tracing::{info, instrument};

use crate::dto::{CastVoteRequest, TopicForViewer, TopicResponse, VoteHistoryResponse, VoteResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::topic::TopicService;
use super::user::HISTORY_LIMIT;

/// Vote service
pub struct VoteService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> VoteService<'a> {
    /// Create a new VoteService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Cast a vote and return the topic with recomputed percentages
    #[instrument(skip(self, request), fields(voter = %voter, option = request.option_index))]
    pub async fn cast_vote(
        &self,
        topic_id: Snowflake,
        voter: &Identity,
        request: CastVoteRequest,
    ) -> ServiceResult<TopicResponse> {
        let mut topic = TopicService::new(self.ctx).require_topic(topic_id).await?;
        let option_index = request.option_index;

        let existing = self.ctx.vote_repo().find(topic.id, voter).await?;
        ledger::ensure_can_cast(&topic, existing.as_ref(), option_index, Utc::now())?;

        let vote = VoteRecord::new(topic.id, *voter, option_index);
        let vote_count = self.ctx.vote_repo().cast(&vote).await?;
        topic.set_vote_count(option_index, vote_count);

        info!(topic_id = %topic.id, vote_count, "Vote cast");

        self.ctx
            .publish(DomainEvent::VoteCast(VoteChangedEvent {
                topic_id: topic.id,
                option_index,
                vote_count,
                timestamp: vote.voted_at,
            }))
            .await;

        Ok(respond(&topic, voter, Some(option_index)))
    }

    /// Withdraw the caller's vote. Refused once the caller commented under
    /// the voted option.
    #[instrument(skip(self), fields(voter = %voter))]
    pub async fn cancel_vote(
        &self,
        topic_id: Snowflake,
        voter: &Identity,
    ) -> ServiceResult<TopicResponse> {
        let mut topic = TopicService::new(self.ctx).require_topic(topic_id).await?;

        let cancellation = self.ctx.vote_repo().cancel(topic.id, voter).await?;
        topic.set_vote_count(cancellation.option_index, cancellation.vote_count);

        info!(
            topic_id = %topic.id,
            option_index = cancellation.option_index,
            vote_count = cancellation.vote_count,
            "Vote cancelled"
        );

        self.ctx
            .publish(DomainEvent::VoteCancelled(VoteChangedEvent {
                topic_id: topic.id,
                option_index: cancellation.option_index,
                vote_count: cancellation.vote_count,
                timestamp: Utc::now(),
            }))
            .await;

        Ok(respond(&topic, voter, None))
    }

    /// The caller's vote on a topic, if any
    #[instrument(skip(self), fields(voter = %voter))]
    pub async fn my_vote(
        &self,
        topic_id: Snowflake,
        voter: &Identity,
    ) -> ServiceResult<Option<VoteResponse>> {
        TopicService::new(self.ctx).require_topic(topic_id).await?;
        let vote = self.ctx.vote_repo().find(topic_id, voter).await?;
        Ok(vote.as_ref().map(VoteResponse::from))
    }

    /// The caller's votes with topic titles, newest first
    #[instrument(skip(self), fields(voter = %voter))]
    pub async fn vote_history(&self, voter: &Identity) -> ServiceResult<Vec<VoteHistoryResponse>> {
        let votes = self
            .ctx
            .vote_repo()
            .find_by_voter(voter, HISTORY_LIMIT)
            .await?;

        let topic_ids: Vec<Snowflake> = votes.iter().map(|v| v.topic_id).collect();
        let topics: HashMap<Snowflake, Topic> = self
            .ctx
            .topic_repo()
            .find_by_ids(&topic_ids)
            .await?
            .into_iter()
            .map(|topic| (topic.id, topic))
            .collect();

        Ok(votes
            .iter()
            .filter_map(|vote| {
                let topic = topics.get(&vote.topic_id)?;
                let option = topic.options.get(vote.option_index)?;
                Some(VoteHistoryResponse {
                    topic_id: vote.topic_id.to_string(),
                    topic_title: topic.title.clone(),
                    option_index: vote.option_index,
                    option_label: option.label.clone(),
                    voted_at: vote.voted_at,
                })
            })
            .collect())
    }
}

fn respond(topic: &Topic, voter: &Identity, my_vote: Option<usize>) -> TopicResponse {
    TopicResponse::from(TopicForViewer {
        topic,
        my_vote,
        is_author: topic.is_author(voter),
    })
}
