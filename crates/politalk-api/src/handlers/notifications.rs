//! Notification handlers

use axum::{extract::State, Json};
use politalk_service::dto::{
    ClearedNotificationsResponse, MarkedReadResponse, NotificationListQuery,
    NotificationListResponse,
};
use politalk_service::NotificationService;

use crate::extractors::{ApiQuery, AuthUser, SnowflakeId};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// GET /notifications?unread_only=&limit=
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<NotificationListQuery>,
) -> ApiResult<Json<NotificationListResponse>> {
    let service = NotificationService::new(state.service_context());
    let response = service.list(auth.user_id, query).await?;
    Ok(Json(response))
}

/// POST /notifications/{notification_id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakeId(notification_id): SnowflakeId,
) -> ApiResult<NoContent> {
    let service = NotificationService::new(state.service_context());
    service.mark_read(auth.user_id, notification_id).await?;
    Ok(NoContent)
}

/// POST /notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<MarkedReadResponse>> {
    let service = NotificationService::new(state.service_context());
    let response = service.mark_all_read(auth.user_id).await?;
    Ok(Json(response))
}

/// DELETE /notifications/{notification_id}
pub async fn delete_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakeId(notification_id): SnowflakeId,
) -> ApiResult<NoContent> {
    let service = NotificationService::new(state.service_context());
    service.delete(auth.user_id, notification_id).await?;
    Ok(NoContent)
}

/// DELETE /notifications
pub async fn delete_all_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ClearedNotificationsResponse>> {
    let service = NotificationService::new(state.service_context());
    let response = service.delete_all(auth.user_id).await?;
    Ok(Json(response))
}
