//! Reaction handlers

use axum::{extract::State, Json};
use politalk_service::dto::{ReactRequest, ReactionResponse};
use politalk_service::ReactionService;

use crate::extractors::{ActingIdentity, SnowflakeId, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Toggle the caller's reaction on a comment
///
/// POST /comments/{comment_id}/reactions
pub async fn react(
    State(state): State<AppState>,
    ActingIdentity(reactor): ActingIdentity,
    SnowflakeId(comment_id): SnowflakeId,
    ValidatedJson(request): ValidatedJson<ReactRequest>,
) -> ApiResult<Json<ReactionResponse>> {
    let service = ReactionService::new(state.service_context());
    let response = service.react(comment_id, &reactor, request).await?;
    Ok(Json(response))
}
