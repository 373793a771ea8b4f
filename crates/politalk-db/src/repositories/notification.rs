//! PostgreSQL implementation of NotificationRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use politalk_core::entities::Notification;
use politalk_core::traits::{NotificationRepository, RepoResult};
use politalk_core::value_objects::Snowflake;

use crate::mappers::NotificationInsert;
use crate::models::NotificationModel;

use super::error::{map_db_error, notification_not_found};

/// PostgreSQL implementation of NotificationRepository
#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    /// Create a new PgNotificationRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    #[instrument(skip(self, notification), fields(receiver_id = %notification.receiver_id))]
    async fn create(&self, notification: &Notification) -> RepoResult<()> {
        let insert = NotificationInsert::new(notification);

        sqlx::query(
            r"
            INSERT INTO notifications (id, receiver_id, sender_key, topic_id, comment_id, kind,
                                       read, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(insert.id)
        .bind(insert.receiver_id)
        .bind(&insert.sender_key)
        .bind(insert.topic_id)
        .bind(insert.comment_id)
        .bind(insert.kind)
        .bind(insert.read)
        .bind(insert.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_receiver(
        &self,
        receiver_id: Snowflake,
        limit: i64,
        unread_only: bool,
    ) -> RepoResult<Vec<Notification>> {
        let results = sqlx::query_as::<_, NotificationModel>(
            r"
            SELECT id, receiver_id, sender_key, topic_id, comment_id, kind, read, created_at
            FROM notifications
            WHERE receiver_id = $1 AND (NOT $2 OR read = FALSE)
            ORDER BY created_at DESC, id DESC
            LIMIT $3
            ",
        )
        .bind(receiver_id.into_inner())
        .bind(unread_only)
        .bind(limit.clamp(1, 100))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(Notification::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn unread_count(&self, receiver_id: Snowflake) -> RepoResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications WHERE receiver_id = $1 AND read = FALSE",
        )
        .bind(receiver_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self))]
    async fn mark_read(&self, id: Snowflake, receiver_id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE notifications SET read = TRUE WHERE id = $1 AND receiver_id = $2",
        )
        .bind(id.into_inner())
        .bind(receiver_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(notification_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn mark_all_read(&self, receiver_id: Snowflake) -> RepoResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET read = TRUE WHERE receiver_id = $1 AND read = FALSE",
        )
        .bind(receiver_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake, receiver_id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND receiver_id = $2")
            .bind(id.into_inner())
            .bind(receiver_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(notification_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_all(&self, receiver_id: Snowflake) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE receiver_id = $1")
            .bind(receiver_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgNotificationRepository>();
    }
}
