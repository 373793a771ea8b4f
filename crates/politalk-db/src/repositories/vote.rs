//! PostgreSQL implementation of VoteRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use politalk_core::entities::{VoteCancellation, VoteRecord};
use politalk_core::error::DomainError;
use politalk_core::policy::ledger;
use politalk_core::traits::{RepoResult, VoteRepository};
use politalk_core::value_objects::{Identity, Snowflake};

use crate::mappers::option_position;
use crate::models::VoteModel;

use super::error::{map_db_error, map_foreign_key_violation};

/// PostgreSQL implementation of VoteRepository
#[derive(Clone)]
pub struct PgVoteRepository {
    pool: PgPool,
}

impl PgVoteRepository {
    /// Create a new PgVoteRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VoteRepository for PgVoteRepository {
    #[instrument(skip(self))]
    async fn find(&self, topic_id: Snowflake, voter: &Identity) -> RepoResult<Option<VoteRecord>> {
        let result = sqlx::query_as::<_, VoteModel>(
            r"
            SELECT topic_id, voter_key, option_index, voted_at
            FROM votes
            WHERE topic_id = $1 AND voter_key = $2
            ",
        )
        .bind(topic_id.into_inner())
        .bind(voter.key())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(VoteRecord::try_from).transpose()
    }

    #[instrument(skip(self, vote), fields(topic_id = %vote.topic_id, option = vote.option_index))]
    async fn cast(&self, vote: &VoteRecord) -> RepoResult<i64> {
        let position = option_position(vote.option_index);
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // The primary key admits one vote per identity and topic
        let inserted = sqlx::query(
            r"
            INSERT INTO votes (topic_id, voter_key, option_index, voted_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (topic_id, voter_key) DO NOTHING
            ",
        )
        .bind(vote.topic_id.into_inner())
        .bind(vote.voter.key())
        .bind(position)
        .bind(vote.voted_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_foreign_key_violation(e, || DomainError::UnknownOption(vote.option_index)))?;

        if inserted.rows_affected() == 0 {
            return Err(DomainError::AlreadyVoted);
        }

        let tally: Option<(i64,)> = sqlx::query_as(
            r"
            UPDATE topic_options
            SET vote_count = vote_count + 1
            WHERE topic_id = $1 AND position = $2
            RETURNING vote_count
            ",
        )
        .bind(vote.topic_id.into_inner())
        .bind(position)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let Some((vote_count,)) = tally else {
            return Err(DomainError::UnknownOption(vote.option_index));
        };

        tx.commit().await.map_err(map_db_error)?;
        debug!(vote_count, "Vote recorded");
        Ok(vote_count)
    }

    #[instrument(skip(self))]
    async fn cancel(
        &self,
        topic_id: Snowflake,
        voter: &Identity,
    ) -> RepoResult<VoteCancellation> {
        let voter_key = voter.key();
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let existing = sqlx::query_as::<_, VoteModel>(
            r"
            SELECT topic_id, voter_key, option_index, voted_at
            FROM votes
            WHERE topic_id = $1 AND voter_key = $2
            FOR UPDATE
            ",
        )
        .bind(topic_id.into_inner())
        .bind(&voter_key)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .map(VoteRecord::try_from)
        .transpose()?;

        let has_comment = match &existing {
            Some(vote) => {
                let (exists,): (bool,) = sqlx::query_as(
                    r"
                    SELECT EXISTS(
                        SELECT 1 FROM comments
                        WHERE topic_id = $1 AND author_key = $2 AND option_index = $3
                    )
                    ",
                )
                .bind(topic_id.into_inner())
                .bind(&voter_key)
                .bind(option_position(vote.option_index))
                .fetch_one(&mut *tx)
                .await
                .map_err(map_db_error)?;
                exists
            }
            None => false,
        };

        let vote = ledger::ensure_can_cancel(existing.as_ref(), has_comment)?;
        let position = option_position(vote.option_index);

        sqlx::query("DELETE FROM votes WHERE topic_id = $1 AND voter_key = $2")
            .bind(topic_id.into_inner())
            .bind(&voter_key)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let (vote_count,): (i64,) = sqlx::query_as(
            r"
            UPDATE topic_options
            SET vote_count = GREATEST(vote_count - 1, 0)
            WHERE topic_id = $1 AND position = $2
            RETURNING vote_count
            ",
        )
        .bind(topic_id.into_inner())
        .bind(position)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let cancellation = VoteCancellation {
            option_index: vote.option_index,
            vote_count,
        };

        tx.commit().await.map_err(map_db_error)?;
        Ok(cancellation)
    }

    #[instrument(skip(self))]
    async fn find_by_voter(&self, voter: &Identity, limit: i64) -> RepoResult<Vec<VoteRecord>> {
        let results = sqlx::query_as::<_, VoteModel>(
            r"
            SELECT topic_id, voter_key, option_index, voted_at
            FROM votes
            WHERE voter_key = $1
            ORDER BY voted_at DESC
            LIMIT $2
            ",
        )
        .bind(voter.key())
        .bind(limit.clamp(1, 100))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(VoteRecord::try_from).collect()
    }
}
