//! Comment handlers

use axum::{extract::State, Json};
use politalk_service::dto::{
    CommentListQuery, CommentResponse, CreateCommentRequest, PaginatedResponse, ReportResponse,
};
use politalk_service::CommentService;
use serde::Deserialize;

use crate::extractors::{ActingIdentity, ApiQuery, OptionalIdentity, SnowflakeId, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// `?option=N` for best comments
#[derive(Debug, Deserialize)]
pub struct BestCommentsQuery {
    pub option: usize,
}

/// Post a comment or a reply
///
/// POST /topics/{topic_id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    ActingIdentity(author): ActingIdentity,
    SnowflakeId(topic_id): SnowflakeId,
    ValidatedJson(request): ValidatedJson<CreateCommentRequest>,
) -> ApiResult<Created<Json<CommentResponse>>> {
    let service = CommentService::new(state.service_context());
    let response = service.create_comment(topic_id, author, request).await?;
    Ok(Created(Json(response)))
}

/// GET /topics/{topic_id}/comments?option=&sort=latest|score&page=
pub async fn list_comments(
    State(state): State<AppState>,
    viewer: OptionalIdentity,
    SnowflakeId(topic_id): SnowflakeId,
    ApiQuery(query): ApiQuery<CommentListQuery>,
) -> ApiResult<Json<PaginatedResponse<CommentResponse>>> {
    let service = CommentService::new(state.service_context());
    let response = service
        .list_comments(topic_id, viewer.as_ref(), query)
        .await?;
    Ok(Json(response))
}

/// Top comments of one option by reaction score
///
/// GET /topics/{topic_id}/comments/best?option=
pub async fn best_comments(
    State(state): State<AppState>,
    viewer: OptionalIdentity,
    SnowflakeId(topic_id): SnowflakeId,
    ApiQuery(query): ApiQuery<BestCommentsQuery>,
) -> ApiResult<Json<Vec<CommentResponse>>> {
    let service = CommentService::new(state.service_context());
    let response = service
        .best_comments(topic_id, query.option, viewer.as_ref())
        .await?;
    Ok(Json(response))
}

/// DELETE /comments/{comment_id}
pub async fn delete_comment(
    State(state): State<AppState>,
    ActingIdentity(actor): ActingIdentity,
    SnowflakeId(comment_id): SnowflakeId,
) -> ApiResult<NoContent> {
    let service = CommentService::new(state.service_context());
    service.delete_comment(comment_id, &actor).await?;
    Ok(NoContent)
}

/// POST /comments/{comment_id}/report
pub async fn report_comment(
    State(state): State<AppState>,
    ActingIdentity(reporter): ActingIdentity,
    SnowflakeId(comment_id): SnowflakeId,
) -> ApiResult<Json<ReportResponse>> {
    let service = CommentService::new(state.service_context());
    let response = service.report_comment(comment_id, &reporter).await?;
    Ok(Json(response))
}
