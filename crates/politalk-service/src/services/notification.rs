//! Notification service

use std::collections::HashMap;

use politalk_core::entities::ANONYMOUS_LABEL_PREFIX;
use politalk_core::{Identity, Snowflake};
use tracing::{info, instrument};

use crate::dto::{
    ClearedNotificationsResponse, MarkedReadResponse, NotificationListQuery,
    NotificationListResponse, NotificationResponse, NotificationWithSender,
};

use super::context::ServiceContext;
use super::error::ServiceResult;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 100;

/// Notification service
pub struct NotificationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> NotificationService<'a> {
    /// Create a new NotificationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// The user's notifications, newest first, with the unread count
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        user_id: Snowflake,
        query: NotificationListQuery,
    ) -> ServiceResult<NotificationListResponse> {
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let notifications = self
            .ctx
            .notification_repo()
            .find_by_receiver(user_id, limit, query.unread_only)
            .await?;
        let unread_count = self.ctx.notification_repo().unread_count(user_id).await?;

        let mut sender_ids: Vec<Snowflake> = notifications
            .iter()
            .filter_map(|n| n.sender.member_id())
            .collect();
        sender_ids.sort_unstable();
        sender_ids.dedup();

        let nicknames: HashMap<Snowflake, String> = if sender_ids.is_empty() {
            HashMap::new()
        } else {
            self.ctx
                .user_repo()
                .find_by_ids(&sender_ids)
                .await?
                .into_iter()
                .map(|user| (user.id, user.nickname))
                .collect()
        };

        let notifications = notifications
            .into_iter()
            .map(|notification| {
                // anonymous senders stay anonymous outside their topic
                let sender_name = match notification.sender {
                    Identity::Member(id) => nicknames.get(&id).cloned(),
                    Identity::Anonymous(_) => None,
                }
                .unwrap_or_else(|| ANONYMOUS_LABEL_PREFIX.to_string());

                NotificationResponse::from(NotificationWithSender {
                    notification,
                    sender_name,
                })
            })
            .collect();

        Ok(NotificationListResponse {
            notifications,
            unread_count,
        })
    }

    /// Mark one of the user's notifications read
    #[instrument(skip(self))]
    pub async fn mark_read(&self, user_id: Snowflake, notification_id: Snowflake) -> ServiceResult<()> {
        self.ctx
            .notification_repo()
            .mark_read(notification_id, user_id)
            .await?;
        Ok(())
    }

    /// Mark all of the user's notifications read
    #[instrument(skip(self))]
    pub async fn mark_all_read(&self, user_id: Snowflake) -> ServiceResult<MarkedReadResponse> {
        let updated = self.ctx.notification_repo().mark_all_read(user_id).await?;
        info!(updated, "Notifications marked read");
        Ok(MarkedReadResponse { updated })
    }

    /// Delete one of the user's notifications
    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Snowflake, notification_id: Snowflake) -> ServiceResult<()> {
        self.ctx
            .notification_repo()
            .delete(notification_id, user_id)
            .await?;
        Ok(())
    }

    /// Delete every notification the user has received
    #[instrument(skip(self))]
    pub async fn delete_all(&self, user_id: Snowflake) -> ServiceResult<ClearedNotificationsResponse> {
        let deleted = self.ctx.notification_repo().delete_all(user_id).await?;
        info!(deleted, "Notifications cleared");
        Ok(ClearedNotificationsResponse { deleted })
    }
}
