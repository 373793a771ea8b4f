//! PostgreSQL implementation of AnonymousAliasRepository

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, instrument};

use politalk_core::entities::AnonymousAlias;
use politalk_core::traits::{AnonymousAliasRepository, RepoResult};
use politalk_core::value_objects::{AnonymousId, Snowflake};

use crate::models::AnonymousAliasModel;

use super::error::{map_db_error, map_foreign_key_violation, topic_not_found};

/// PostgreSQL implementation of AnonymousAliasRepository
#[derive(Clone)]
pub struct PgAnonymousAliasRepository {
    pool: PgPool,
}

impl PgAnonymousAliasRepository {
    /// Create a new PgAnonymousAliasRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Serialize label allocation within one topic until the transaction ends.
/// Comment inserts take the same lock, so label order is insert order.
pub(crate) async fn lock_topic_aliases(
    conn: &mut PgConnection,
    topic_id: Snowflake,
) -> RepoResult<()> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(topic_id.into_inner())
        .execute(&mut *conn)
        .await
        .map_err(map_db_error)?;
    Ok(())
}

/// Existing alias, or the next ordinal. Caller must hold the topic lock.
pub(crate) async fn assign_locked(
    conn: &mut PgConnection,
    topic_id: Snowflake,
    anonymous_id: AnonymousId,
) -> RepoResult<AnonymousAlias> {
    let existing = sqlx::query_as::<_, AnonymousAliasModel>(
        r"
        SELECT topic_id, anonymous_id, ordinal
        FROM anonymous_aliases
        WHERE topic_id = $1 AND anonymous_id = $2
        ",
    )
    .bind(topic_id.into_inner())
    .bind(anonymous_id.to_string())
    .fetch_optional(&mut *conn)
    .await
    .map_err(map_db_error)?;

    if let Some(model) = existing {
        return AnonymousAlias::try_from(model);
    }

    let (ordinal,): (i32,) = sqlx::query_as(
        r"
        INSERT INTO anonymous_aliases (topic_id, anonymous_id, ordinal)
        SELECT $1, $2, COALESCE(MAX(ordinal), 0) + 1
        FROM anonymous_aliases
        WHERE topic_id = $1
        RETURNING ordinal
        ",
    )
    .bind(topic_id.into_inner())
    .bind(anonymous_id.to_string())
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| map_foreign_key_violation(e, || topic_not_found(topic_id)))?;

    debug!(topic_id = %topic_id, ordinal, "Anonymous alias assigned");
    Ok(AnonymousAlias::new(topic_id, anonymous_id, ordinal))
}

#[async_trait]
impl AnonymousAliasRepository for PgAnonymousAliasRepository {
    #[instrument(skip(self))]
    async fn find_by_topic(&self, topic_id: Snowflake) -> RepoResult<Vec<AnonymousAlias>> {
        let results = sqlx::query_as::<_, AnonymousAliasModel>(
            r"
            SELECT topic_id, anonymous_id, ordinal
            FROM anonymous_aliases
            WHERE topic_id = $1
            ORDER BY ordinal
            ",
        )
        .bind(topic_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(AnonymousAlias::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn assign(
        &self,
        topic_id: Snowflake,
        anonymous_id: AnonymousId,
    ) -> RepoResult<AnonymousAlias> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        lock_topic_aliases(&mut *tx, topic_id).await?;
        let alias = assign_locked(&mut *tx, topic_id, anonymous_id).await?;
        tx.commit().await.map_err(map_db_error)?;
        Ok(alias)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgAnonymousAliasRepository>();
    }
}
