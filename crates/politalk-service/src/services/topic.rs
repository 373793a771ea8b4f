//! Topic service
//!
//! Creating, reading, listing, and ranking topics, plus view counting and reports.

use chrono::Utc;
use politalk_core::entities::{
    Category, Topic, TopicOption, MAX_OPTIONS, MAX_TOPIC_IMAGES, MIN_OPTIONS,
};
use politalk_core::events::TopicCreatedEvent;
use politalk_core::policy::{rank_hot, HOT_TOPIC_LIMIT};
use politalk_core::traits::{TopicQuery, TopicSort};
use politalk_core::{DomainError, DomainEvent, HotWindow, Identity, Snowflake};
use tracing::{info, instrument};

use crate::dto::{
    CreateTopicRequest, HotTopicsQuery, PaginatedResponse, ReportResponse, TopicForViewer,
    TopicListQuery, TopicOptionInput, TopicResponse, TopicSummaryResponse, ViewCountResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Topic service
pub struct TopicService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TopicService<'a> {
    /// Create a new TopicService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Load a topic or fail with `TopicNotFound`
    pub(crate) async fn require_topic(&self, topic_id: Snowflake) -> ServiceResult<Topic> {
        self.ctx
            .topic_repo()
            .find_by_id(topic_id)
            .await?
            .ok_or_else(|| DomainError::TopicNotFound(topic_id).into())
    }

    /// Create a topic with 2 to 6 options
    #[instrument(skip(self, request), fields(author = %author, title = %request.title))]
    pub async fn create_topic(
        &self,
        author: Identity,
        request: CreateTopicRequest,
    ) -> ServiceResult<TopicResponse> {
        if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&request.options.len()) {
            return Err(DomainError::InvalidOptionCount {
                min: MIN_OPTIONS,
                max: MAX_OPTIONS,
            }
            .into());
        }
        if request.image_urls.len() > MAX_TOPIC_IMAGES {
            return Err(DomainError::TooManyImages {
                max: MAX_TOPIC_IMAGES,
            }
            .into());
        }
        let category = parse_category(request.category.as_deref())?.unwrap_or_default();
        if request.deadline.is_some_and(|deadline| deadline <= Utc::now()) {
            return Err(ServiceError::validation("Deadline must be in the future"));
        }

        let options = build_options(request.options);
        let mut topic = Topic::new(
            self.ctx.generate_id(),
            request.title.trim().to_string(),
            request.body,
            category,
            options,
            Some(author),
        );
        topic.thumbnail_url = request
            .thumbnail_url
            .or_else(|| request.image_urls.first().cloned());
        topic.image_urls = request.image_urls;
        topic.deadline = request.deadline;

        self.ctx.topic_repo().create(&topic).await?;

        info!(topic_id = %topic.id, options = topic.options.len(), "Topic created");

        self.ctx
            .publish(DomainEvent::TopicCreated(TopicCreatedEvent {
                topic_id: topic.id,
                title: topic.title.clone(),
                category: topic.category.as_str().to_string(),
                timestamp: topic.created_at,
            }))
            .await;

        Ok(TopicResponse::from(TopicForViewer {
            topic: &topic,
            my_vote: None,
            is_author: true,
        }))
    }

    /// Get a topic with its tallies and the caller's vote
    #[instrument(skip(self, viewer))]
    pub async fn get_topic(
        &self,
        topic_id: Snowflake,
        viewer: Option<&Identity>,
    ) -> ServiceResult<TopicResponse> {
        let topic = self.require_topic(topic_id).await?;

        let my_vote = match viewer {
            Some(identity) => self
                .ctx
                .vote_repo()
                .find(topic.id, identity)
                .await?
                .map(|vote| vote.option_index),
            None => None,
        };

        Ok(TopicResponse::from(TopicForViewer {
            is_author: viewer.is_some_and(|identity| topic.is_author(identity)),
            topic: &topic,
            my_vote,
        }))
    }

    /// List topics: pinned first, then latest or most popular
    #[instrument(skip(self))]
    pub async fn list_topics(
        &self,
        query: TopicListQuery,
    ) -> ServiceResult<PaginatedResponse<TopicSummaryResponse>> {
        let category = parse_category(query.category.as_deref())?;
        let sort = match query.sort.as_deref() {
            None | Some("latest") => TopicSort::Latest,
            Some("popular") => TopicSort::Popular,
            Some(other) => {
                return Err(ServiceError::validation(format!("Unknown sort: {other}")));
            }
        };
        let page = self.ctx.settings().page(query.page);

        let topics = self
            .ctx
            .topic_repo()
            .list(&TopicQuery {
                category,
                sort,
                limit: page.limit(),
                offset: page.offset(),
            })
            .await?;
        let total = self.ctx.topic_repo().count(category).await?;

        Ok(PaginatedResponse::new(
            topics.iter().map(TopicSummaryResponse::from).collect(),
            page.number,
            page.size,
            total,
        ))
    }

    /// Pinned topics, then the most popular topics of the window
    #[instrument(skip(self))]
    pub async fn hot_topics(&self, query: HotTopicsQuery) -> ServiceResult<Vec<TopicSummaryResponse>> {
        let window = match query.window.as_deref() {
            None => HotWindow::default(),
            Some(name) => HotWindow::parse(name)
                .ok_or_else(|| ServiceError::validation(format!("Unknown window: {name}")))?,
        };
        let now = Utc::now();

        let candidates = self
            .ctx
            .topic_repo()
            .find_hot_candidates(window.since(now), HOT_TOPIC_LIMIT as i64)
            .await?;

        Ok(rank_hot(candidates, window, now, HOT_TOPIC_LIMIT)
            .iter()
            .map(TopicSummaryResponse::from)
            .collect())
    }

    /// Count one view
    #[instrument(skip(self))]
    pub async fn record_view(&self, topic_id: Snowflake) -> ServiceResult<ViewCountResponse> {
        let view_count = self.ctx.topic_repo().increment_views(topic_id).await?;
        Ok(ViewCountResponse { view_count })
    }

    /// Report a topic, once per identity
    #[instrument(skip(self), fields(reporter = %reporter))]
    pub async fn report_topic(
        &self,
        topic_id: Snowflake,
        reporter: &Identity,
    ) -> ServiceResult<ReportResponse> {
        let report_count = self.ctx.topic_repo().report(topic_id, reporter).await?;

        info!(topic_id = %topic_id, report_count, "Topic reported");

        Ok(ReportResponse {
            report_count,
            visibility: None,
        })
    }
}

/// `None` and `all` mean no filter
fn parse_category(name: Option<&str>) -> ServiceResult<Option<Category>> {
    match name {
        None | Some("" | "all") => Ok(None),
        Some(name) => Category::parse(name)
            .map(Some)
            .ok_or_else(|| ServiceError::validation(format!("Unknown category: {name}"))),
    }
}

fn build_options(inputs: Vec<TopicOptionInput>) -> Vec<TopicOption> {
    inputs
        .into_iter()
        .enumerate()
        .map(|(index, input)| {
            let label = input
                .label
                .map(|label| label.trim().to_string())
                .filter(|label| !label.is_empty())
                .unwrap_or_else(|| TopicOption::default_label(index));
            TopicOption::new(label, input.image_url)
        })
        .collect()
}
