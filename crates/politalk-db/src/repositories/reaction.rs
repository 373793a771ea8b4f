//! PostgreSQL implementation of ReactionRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use politalk_core::entities::{
    Reaction, ReactionChange, ReactionKind, ReactionOutcome, ReactionTally,
};
use politalk_core::traits::{ReactionRepository, RepoResult};
use politalk_core::value_objects::{Identity, Snowflake};

use crate::mappers::corrupt;
use crate::models::{ReactionCountsModel, ReactionModel};

use super::error::{comment_not_found, map_db_error};

/// PostgreSQL implementation of ReactionRepository
#[derive(Clone)]
pub struct PgReactionRepository {
    pool: PgPool,
}

impl PgReactionRepository {
    /// Create a new PgReactionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReactionRepository for PgReactionRepository {
    #[instrument(skip(self, comment_ids), fields(count = comment_ids.len()))]
    async fn find_for_reactor(
        &self,
        comment_ids: &[Snowflake],
        reactor: &Identity,
    ) -> RepoResult<Vec<Reaction>> {
        if comment_ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<i64> = comment_ids.iter().map(|id| id.into_inner()).collect();
        let results = sqlx::query_as::<_, ReactionModel>(
            r"
            SELECT comment_id, reactor_key, kind, created_at
            FROM comment_reactions
            WHERE comment_id = ANY($1) AND reactor_key = $2
            ",
        )
        .bind(&raw)
        .bind(reactor.key())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(Reaction::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn react(
        &self,
        comment_id: Snowflake,
        reactor: &Identity,
        kind: ReactionKind,
    ) -> RepoResult<ReactionOutcome> {
        let reactor_key = reactor.key();
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // The comment row lock serializes every reaction on this comment
        let counts = sqlx::query_as::<_, ReactionCountsModel>(
            r"
            SELECT thumbs_up, thumbs_down, sad, angry, strong
            FROM comments
            WHERE id = $1
            FOR UPDATE
            ",
        )
        .bind(comment_id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| comment_not_found(comment_id))?;

        let previous: Option<(String,)> = sqlx::query_as(
            "SELECT kind FROM comment_reactions WHERE comment_id = $1 AND reactor_key = $2",
        )
        .bind(comment_id.into_inner())
        .bind(&reactor_key)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let previous = previous
            .map(|(stored,)| {
                ReactionKind::parse(&stored)
                    .ok_or_else(|| corrupt("comment_reactions.kind", &stored))
            })
            .transpose()?;

        let change = ReactionChange::resolve(previous, kind);

        match change.current() {
            Some(current) => {
                sqlx::query(
                    r"
                    INSERT INTO comment_reactions (comment_id, reactor_key, kind, created_at)
                    VALUES ($1, $2, $3, NOW())
                    ON CONFLICT (comment_id, reactor_key)
                    DO UPDATE SET kind = EXCLUDED.kind, created_at = EXCLUDED.created_at
                    ",
                )
                .bind(comment_id.into_inner())
                .bind(&reactor_key)
                .bind(current.as_str())
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
            }
            None => {
                sqlx::query(
                    "DELETE FROM comment_reactions WHERE comment_id = $1 AND reactor_key = $2",
                )
                .bind(comment_id.into_inner())
                .bind(&reactor_key)
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
            }
        }

        let mut tally = ReactionTally::from(counts);
        tally.apply(change);

        sqlx::query(
            r"
            UPDATE comments
            SET thumbs_up = $2, thumbs_down = $3, sad = $4, angry = $5, strong = $6, score = $7
            WHERE id = $1
            ",
        )
        .bind(comment_id.into_inner())
        .bind(tally.thumbs_up)
        .bind(tally.thumbs_down)
        .bind(tally.sad)
        .bind(tally.angry)
        .bind(tally.strong)
        .bind(tally.score())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        debug!(?change, score = tally.score(), "Reaction applied");

        Ok(ReactionOutcome { change, tally })
    }
}
