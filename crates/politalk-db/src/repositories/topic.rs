//! PostgreSQL implementation of TopicRepository

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use politalk_core::entities::{Category, Topic, TopicWithActivity};
use politalk_core::error::DomainError;
use politalk_core::policy::COMMENT_WEIGHT;
use politalk_core::traits::{RepoResult, TopicQuery, TopicRepository, TopicSort};
use politalk_core::value_objects::{Identity, Snowflake};

use crate::mappers::{topic_with_options, TopicInsert, TopicOptionInsert};
use crate::models::{TopicActivityModel, TopicModel, TopicOptionModel};

use super::error::{map_db_error, topic_not_found};

const TOPIC_COLUMNS: &str = "t.id, t.title, t.body, t.category, t.image_urls, t.thumbnail_url, \
     t.pinned, t.report_count, t.view_count, t.author_key, t.created_at, t.deadline";

/// Topics joined with their comment count, exposed as `s`
fn activity_source(filter: &str) -> String {
    format!(
        "(SELECT {TOPIC_COLUMNS}, \
                 (SELECT COUNT(*) FROM comments c WHERE c.topic_id = t.id) AS comment_count \
          FROM topics t {filter}) s"
    )
}

/// A second report by the same identity collides on the primary key
fn map_report_error(e: sqlx::Error, id: Snowflake) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return topic_not_found(id);
        }
        if db_err.is_unique_violation() {
            return DomainError::AlreadyReported;
        }
    }
    map_db_error(e)
}

fn popularity_order() -> String {
    format!("s.view_count + {COMMENT_WEIGHT} * s.comment_count DESC, s.created_at DESC, s.id DESC")
}

/// Pinned topics newest first, then the rest by popularity
fn hot_order() -> String {
    format!(
        "s.pinned DESC, CASE WHEN s.pinned THEN s.created_at END DESC NULLS LAST, {}",
        popularity_order()
    )
}

/// PostgreSQL implementation of TopicRepository
#[derive(Clone)]
pub struct PgTopicRepository {
    pool: PgPool,
}

impl PgTopicRepository {
    /// Create a new PgTopicRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Options of the given topics, grouped by topic id
    async fn load_options(&self, topic_ids: &[i64]) -> RepoResult<HashMap<i64, Vec<TopicOptionModel>>> {
        if topic_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, TopicOptionModel>(
            r"
            SELECT topic_id, position, label, image_url, vote_count
            FROM topic_options
            WHERE topic_id = ANY($1)
            ORDER BY topic_id, position
            ",
        )
        .bind(topic_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let mut grouped: HashMap<i64, Vec<TopicOptionModel>> = HashMap::new();
        for row in rows {
            grouped.entry(row.topic_id).or_default().push(row);
        }
        Ok(grouped)
    }

    async fn with_options(&self, models: Vec<TopicModel>) -> RepoResult<Vec<Topic>> {
        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let mut options = self.load_options(&ids).await?;

        models
            .into_iter()
            .map(|model| {
                let opts = options.remove(&model.id).unwrap_or_default();
                topic_with_options(model, opts)
            })
            .collect()
    }

    async fn activities_with_options(
        &self,
        models: Vec<TopicActivityModel>,
    ) -> RepoResult<Vec<TopicWithActivity>> {
        let ids: Vec<i64> = models.iter().map(|m| m.topic.id).collect();
        let mut options = self.load_options(&ids).await?;

        models
            .into_iter()
            .map(|model| {
                let opts = options.remove(&model.topic.id).unwrap_or_default();
                model.into_activity(opts)
            })
            .collect()
    }
}

#[async_trait]
impl TopicRepository for PgTopicRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Topic>> {
        let sql = format!("SELECT {TOPIC_COLUMNS} FROM topics t WHERE t.id = $1");
        let result = sqlx::query_as::<_, TopicModel>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        match result {
            Some(model) => Ok(self.with_options(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Topic>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<i64> = ids.iter().map(|id| id.into_inner()).collect();
        let sql = format!("SELECT {TOPIC_COLUMNS} FROM topics t WHERE t.id = ANY($1)");
        let results = sqlx::query_as::<_, TopicModel>(&sql)
            .bind(&raw)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        self.with_options(results).await
    }

    #[instrument(skip(self, topic), fields(topic_id = %topic.id))]
    async fn create(&self, topic: &Topic) -> RepoResult<()> {
        let insert = TopicInsert::new(topic);
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO topics (id, title, body, category, image_urls, thumbnail_url, pinned,
                                author_key, created_at, deadline)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(insert.id)
        .bind(insert.title)
        .bind(insert.body)
        .bind(insert.category)
        .bind(insert.image_urls)
        .bind(insert.thumbnail_url)
        .bind(insert.pinned)
        .bind(&insert.author_key)
        .bind(insert.created_at)
        .bind(insert.deadline)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        for option in TopicOptionInsert::all(topic) {
            sqlx::query(
                r"
                INSERT INTO topic_options (topic_id, position, label, image_url)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(insert.id)
            .bind(option.position)
            .bind(option.label)
            .bind(option.image_url)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM topics WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(topic_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_pinned(&self, id: Snowflake, pinned: bool) -> RepoResult<()> {
        let result = sqlx::query("UPDATE topics SET pinned = $2 WHERE id = $1")
            .bind(id.into_inner())
            .bind(pinned)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(topic_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn increment_views(&self, id: Snowflake) -> RepoResult<i64> {
        let result: Option<(i64,)> = sqlx::query_as(
            "UPDATE topics SET view_count = view_count + 1 WHERE id = $1 RETURNING view_count",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(|(count,)| count).ok_or_else(|| topic_not_found(id))
    }

    #[instrument(skip(self))]
    async fn report(&self, id: Snowflake, reporter: &Identity) -> RepoResult<i32> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query("INSERT INTO topic_reports (topic_id, reporter_key) VALUES ($1, $2)")
            .bind(id.into_inner())
            .bind(reporter.key())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_report_error(e, id))?;

        let (count,): (i32,) = sqlx::query_as(
            "UPDATE topics SET report_count = report_count + 1 WHERE id = $1 RETURNING report_count",
        )
        .bind(id.into_inner())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(count)
    }

    #[instrument(skip(self))]
    async fn list(&self, query: &TopicQuery) -> RepoResult<Vec<TopicWithActivity>> {
        let order = match query.sort {
            TopicSort::Latest => "s.created_at DESC, s.id DESC".to_string(),
            TopicSort::Popular => popularity_order(),
        };
        let sql = format!(
            "SELECT * FROM {} ORDER BY s.pinned DESC, {order} LIMIT $2 OFFSET $3",
            activity_source("WHERE ($1::VARCHAR IS NULL OR t.category = $1)")
        );

        let results = sqlx::query_as::<_, TopicActivityModel>(&sql)
            .bind(query.category.map(|c| c.as_str()))
            .bind(query.limit.clamp(1, 100))
            .bind(query.offset.max(0))
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        self.activities_with_options(results).await
    }

    #[instrument(skip(self))]
    async fn count(&self, category: Option<Category>) -> RepoResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM topics WHERE ($1::VARCHAR IS NULL OR category = $1)",
        )
        .bind(category.map(|c| c.as_str()))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self))]
    async fn find_hot_candidates(
        &self,
        since: DateTime<Utc>,
        limit: i64,
    ) -> RepoResult<Vec<TopicWithActivity>> {
        let sql = format!(
            "SELECT * FROM {} WHERE s.pinned OR s.created_at >= $1 ORDER BY {} LIMIT $2",
            activity_source(""),
            hot_order()
        );

        let results = sqlx::query_as::<_, TopicActivityModel>(&sql)
            .bind(since)
            .bind(limit.clamp(1, 100))
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        self.activities_with_options(results).await
    }

    #[instrument(skip(self))]
    async fn find_by_author(
        &self,
        author: &Identity,
        limit: i64,
    ) -> RepoResult<Vec<TopicWithActivity>> {
        let sql = format!(
            "SELECT * FROM {} ORDER BY s.created_at DESC, s.id DESC LIMIT $2",
            activity_source("WHERE t.author_key = $1")
        );

        let results = sqlx::query_as::<_, TopicActivityModel>(&sql)
            .bind(author.key())
            .bind(limit.clamp(1, 100))
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        self.activities_with_options(results).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgTopicRepository>();
    }

    #[test]
    fn test_popularity_order_uses_comment_weight() {
        assert!(popularity_order().starts_with("s.view_count + 3 * s.comment_count DESC"));
        assert!(activity_source("").ends_with(" s"));
    }

    #[test]
    fn test_hot_order_sorts_pinned_by_recency() {
        let order = hot_order();
        assert!(order.starts_with(
            "s.pinned DESC, CASE WHEN s.pinned THEN s.created_at END DESC NULLS LAST, "
        ));
        assert!(order.ends_with(&popularity_order()));
    }
}
