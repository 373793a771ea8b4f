//! PostgreSQL implementation of CommentRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{info, instrument};

use politalk_core::entities::{Comment, ReportOutcome, Visibility};
use politalk_core::error::DomainError;
use politalk_core::traits::{
    CommentQuery, CommentReceipt, CommentRepository, CommentSort, RepoResult,
};
use politalk_core::value_objects::{Identity, Snowflake};

use crate::mappers::{corrupt, option_position, CommentInsert};
use crate::models::{CommentModel, ReportStateModel};

use super::alias::{assign_locked, lock_topic_aliases};
use super::error::{comment_not_found, map_db_error, map_unique_violation};

const COMMENT_COLUMNS: &str = "id, topic_id, option_index, parent_id, author_key, body, image_urls, \
     thumbs_up, thumbs_down, sad, angry, strong, score, report_count, visibility, created_at";

/// Ties are broken oldest first
const SCORE_ORDER: &str = "score DESC, created_at ASC, id ASC";

/// PostgreSQL implementation of CommentRepository
#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    /// Create a new PgCommentRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_comments(models: Vec<CommentModel>) -> RepoResult<Vec<Comment>> {
    models.into_iter().map(Comment::try_from).collect()
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>> {
        let sql = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1");
        let result = sqlx::query_as::<_, CommentModel>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(Comment::try_from).transpose()
    }

    #[instrument(skip(self, comment), fields(comment_id = %comment.id, topic_id = %comment.topic_id))]
    async fn create(
        &self,
        comment: &Comment,
        requires_vote: Option<usize>,
    ) -> RepoResult<CommentReceipt> {
        let insert = CommentInsert::new(comment);
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Holding the vote row blocks a concurrent cancel until the comment exists
        if let Some(option_index) = requires_vote {
            let held: Option<(i32,)> = sqlx::query_as(
                r"
                SELECT option_index FROM votes
                WHERE topic_id = $1 AND voter_key = $2
                FOR SHARE
                ",
            )
            .bind(insert.topic_id)
            .bind(&insert.author_key)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_db_error)?;

            if held.map(|(position,)| position) != Some(option_position(option_index)) {
                return Err(DomainError::VoteRequired { option_index });
            }
        }

        let alias = match comment.author.anonymous_id() {
            Some(anonymous_id) => {
                lock_topic_aliases(&mut *tx, comment.topic_id).await?;
                Some(assign_locked(&mut *tx, comment.topic_id, anonymous_id).await?)
            }
            None => None,
        };

        let (created_at,): (DateTime<Utc>,) = sqlx::query_as(
            r"
            INSERT INTO comments (id, topic_id, option_index, parent_id, author_key, body,
                                  image_urls, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, clock_timestamp())
            RETURNING created_at
            ",
        )
        .bind(insert.id)
        .bind(insert.topic_id)
        .bind(insert.option_index)
        .bind(insert.parent_id)
        .bind(&insert.author_key)
        .bind(insert.body)
        .bind(insert.image_urls)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(CommentReceipt { created_at, alias })
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(comment_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list(&self, query: &CommentQuery) -> RepoResult<Vec<Comment>> {
        let order = match query.sort {
            CommentSort::Latest => "created_at DESC, id DESC",
            CommentSort::Score => SCORE_ORDER,
        };
        let sql = format!(
            r"
            SELECT {COMMENT_COLUMNS}
            FROM comments
            WHERE topic_id = $1 AND parent_id IS NULL
              AND ($2::INTEGER IS NULL OR option_index = $2)
            ORDER BY {order}
            LIMIT $3 OFFSET $4
            "
        );

        let results = sqlx::query_as::<_, CommentModel>(&sql)
            .bind(query.topic_id.into_inner())
            .bind(query.option_index.map(option_position))
            .bind(query.limit.clamp(1, 100))
            .bind(query.offset.max(0))
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        into_comments(results)
    }

    #[instrument(skip(self))]
    async fn count(&self, topic_id: Snowflake, option_index: Option<usize>) -> RepoResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            r"
            SELECT COUNT(*) FROM comments
            WHERE topic_id = $1 AND parent_id IS NULL
              AND ($2::INTEGER IS NULL OR option_index = $2)
            ",
        )
        .bind(topic_id.into_inner())
        .bind(option_index.map(option_position))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self))]
    async fn find_replies(&self, parent_ids: &[Snowflake]) -> RepoResult<Vec<Comment>> {
        if parent_ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<i64> = parent_ids.iter().map(|id| id.into_inner()).collect();
        let sql = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE parent_id = ANY($1) \
             ORDER BY created_at ASC, id ASC"
        );
        let results = sqlx::query_as::<_, CommentModel>(&sql)
            .bind(&raw)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        into_comments(results)
    }

    #[instrument(skip(self))]
    async fn find_best_candidates(
        &self,
        topic_id: Snowflake,
        option_index: usize,
        limit: i64,
    ) -> RepoResult<Vec<Comment>> {
        let sql = format!(
            r"
            SELECT {COMMENT_COLUMNS}
            FROM comments
            WHERE topic_id = $1 AND option_index = $2
              AND parent_id IS NULL AND visibility = $3
            ORDER BY {SCORE_ORDER}
            LIMIT $4
            "
        );

        let results = sqlx::query_as::<_, CommentModel>(&sql)
            .bind(topic_id.into_inner())
            .bind(option_position(option_index))
            .bind(Visibility::Visible.as_str())
            .bind(limit.clamp(1, 100))
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        into_comments(results)
    }

    #[instrument(skip(self))]
    async fn report(&self, id: Snowflake, reporter: &Identity) -> RepoResult<ReportOutcome> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let state = sqlx::query_as::<_, ReportStateModel>(
            "SELECT report_count, visibility FROM comments WHERE id = $1 FOR UPDATE",
        )
        .bind(id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| comment_not_found(id))?;

        let previous = Visibility::parse(&state.visibility)
            .ok_or_else(|| corrupt("comments.visibility", &state.visibility))?;

        sqlx::query("INSERT INTO comment_reports (comment_id, reporter_key) VALUES ($1, $2)")
            .bind(id.into_inner())
            .bind(reporter.key())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_unique_violation(e, |_| DomainError::AlreadyReported))?;

        let report_count = state.report_count + 1;
        let visibility = previous.after_reports(report_count);

        sqlx::query("UPDATE comments SET report_count = $2, visibility = $3 WHERE id = $1")
            .bind(id.into_inner())
            .bind(report_count)
            .bind(visibility.as_str())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        let newly_blinded = previous != visibility;
        if newly_blinded {
            info!(comment_id = %id, report_count, "Comment blinded");
        }

        Ok(ReportOutcome {
            report_count,
            visibility,
            newly_blinded,
        })
    }

    #[instrument(skip(self))]
    async fn restore(&self, id: Snowflake) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let result =
            sqlx::query("UPDATE comments SET report_count = 0, visibility = $2 WHERE id = $1")
                .bind(id.into_inner())
                .bind(Visibility::Visible.as_str())
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(comment_not_found(id));
        }

        // Cleared reports may be filed again
        sqlx::query("DELETE FROM comment_reports WHERE comment_id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_reported(&self, limit: i64, offset: i64) -> RepoResult<Vec<Comment>> {
        let sql = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE report_count > 0 \
             ORDER BY report_count DESC, created_at DESC LIMIT $1 OFFSET $2"
        );
        let results = sqlx::query_as::<_, CommentModel>(&sql)
            .bind(limit.clamp(1, 100))
            .bind(offset.max(0))
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        into_comments(results)
    }

    #[instrument(skip(self))]
    async fn find_by_author(&self, author: &Identity, limit: i64) -> RepoResult<Vec<Comment>> {
        let sql = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE author_key = $1 \
             ORDER BY created_at DESC LIMIT $2"
        );
        let results = sqlx::query_as::<_, CommentModel>(&sql)
            .bind(author.key())
            .bind(limit.clamp(1, 100))
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        into_comments(results)
    }
}
