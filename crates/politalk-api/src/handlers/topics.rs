//! Topic handlers

use axum::{extract::State, Json};
use politalk_service::dto::{
    CreateTopicRequest, HotTopicsQuery, PaginatedResponse, ReportResponse, TopicListQuery,
    TopicResponse, TopicSummaryResponse, ViewCountResponse,
};
use politalk_service::TopicService;

use crate::extractors::{ActingIdentity, ApiQuery, OptionalIdentity, SnowflakeId, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Create a topic
///
/// POST /topics
pub async fn create_topic(
    State(state): State<AppState>,
    ActingIdentity(author): ActingIdentity,
    ValidatedJson(request): ValidatedJson<CreateTopicRequest>,
) -> ApiResult<Created<Json<TopicResponse>>> {
    let service = TopicService::new(state.service_context());
    let response = service.create_topic(author, request).await?;
    Ok(Created(Json(response)))
}

/// List topics, pinned first
///
/// GET /topics?category=&sort=latest|popular&page=
pub async fn list_topics(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TopicListQuery>,
) -> ApiResult<Json<PaginatedResponse<TopicSummaryResponse>>> {
    let service = TopicService::new(state.service_context());
    let response = service.list_topics(query).await?;
    Ok(Json(response))
}

/// GET /topics/hot?window=day|week|month
pub async fn hot_topics(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<HotTopicsQuery>,
) -> ApiResult<Json<Vec<TopicSummaryResponse>>> {
    let service = TopicService::new(state.service_context());
    let response = service.hot_topics(query).await?;
    Ok(Json(response))
}

/// Get a topic. The caller's vote is included when a token is sent.
///
/// GET /topics/{topic_id}
pub async fn get_topic(
    State(state): State<AppState>,
    viewer: OptionalIdentity,
    SnowflakeId(topic_id): SnowflakeId,
) -> ApiResult<Json<TopicResponse>> {
    let service = TopicService::new(state.service_context());
    let response = service.get_topic(topic_id, viewer.as_ref()).await?;
    Ok(Json(response))
}

/// POST /topics/{topic_id}/views
pub async fn record_view(
    State(state): State<AppState>,
    SnowflakeId(topic_id): SnowflakeId,
) -> ApiResult<Json<ViewCountResponse>> {
    let service = TopicService::new(state.service_context());
    let response = service.record_view(topic_id).await?;
    Ok(Json(response))
}

/// POST /topics/{topic_id}/report
pub async fn report_topic(
    State(state): State<AppState>,
    ActingIdentity(reporter): ActingIdentity,
    SnowflakeId(topic_id): SnowflakeId,
) -> ApiResult<Json<ReportResponse>> {
    let service = TopicService::new(state.service_context());
    let response = service.report_topic(topic_id, &reporter).await?;
    Ok(Json(response))
}
