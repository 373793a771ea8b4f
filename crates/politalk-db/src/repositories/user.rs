//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use politalk_core::entities::{User, UserRole};
use politalk_core::error::DomainError;
use politalk_core::traits::{AccountPurge, RepoResult, UserRepository};
use politalk_core::value_objects::{Identity, Snowflake};

use crate::mappers::{UserInsert, UserUpdate};
use crate::models::UserModel;

use super::error::{map_db_error, map_unique_violation, user_not_found};

const USER_COLUMNS: &str =
    "id, nickname, email, avatar_url, role, provider, external_id, created_at, updated_at";

/// Which field a unique violation on users collided with
fn user_conflict(constraint: Option<&str>) -> DomainError {
    match constraint {
        Some("users_email_key") => DomainError::EmailAlreadyExists,
        Some("users_nickname_key") => DomainError::NicknameTaken,
        other => DomainError::DatabaseError(format!(
            "unique violation on {}",
            other.unwrap_or("users")
        )),
    }
}

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PgUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(&self, condition: &str, value: &str) -> RepoResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {condition}");
        let result = sqlx::query_as::<_, UserModel>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(User::try_from).transpose()
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let result = sqlx::query_as::<_, UserModel>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(User::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<i64> = ids.iter().map(|id| id.into_inner()).collect();
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)");
        let results = sqlx::query_as::<_, UserModel>(&sql)
            .bind(&raw)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        results.into_iter().map(User::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        self.fetch_one_where("LOWER(email) = LOWER($1)", email).await
    }

    #[instrument(skip(self))]
    async fn find_by_external_id(&self, external_id: &str) -> RepoResult<Option<User>> {
        self.fetch_one_where("external_id = $1", external_id).await
    }

    #[instrument(skip(self))]
    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))")
                .bind(email)
                .fetch_one(&self.pool)
                .await
                .map_err(map_db_error)?;

        Ok(result.0)
    }

    #[instrument(skip(self))]
    async fn nickname_exists(&self, nickname: &str) -> RepoResult<bool> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(nickname) = LOWER($1))",
        )
        .bind(nickname)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.0)
    }

    #[instrument(skip(self, user, password_hash), fields(user_id = %user.id))]
    async fn create(&self, user: &User, password_hash: Option<&str>) -> RepoResult<()> {
        let insert = UserInsert::new(user, password_hash);

        sqlx::query(
            r"
            INSERT INTO users (id, nickname, email, password_hash, avatar_url, role, provider,
                               external_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(insert.id)
        .bind(insert.nickname)
        .bind(insert.email)
        .bind(insert.password_hash)
        .bind(insert.avatar_url)
        .bind(insert.role)
        .bind(insert.provider)
        .bind(insert.external_id)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, user_conflict))?;

        Ok(())
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn update(&self, user: &User) -> RepoResult<()> {
        let update = UserUpdate::new(user);

        let result = sqlx::query(
            r"
            UPDATE users
            SET nickname = $2, avatar_url = $3, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(update.id)
        .bind(update.nickname)
        .bind(update.avatar_url)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, user_conflict))?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(user.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_role(&self, id: Snowflake, role: UserRole) -> RepoResult<()> {
        let result = sqlx::query("UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1")
            .bind(id.into_inner())
            .bind(role.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_account(&self, id: Snowflake) -> RepoResult<AccountPurge> {
        let author_key = Identity::Member(id).key();
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Comments on the user's topics cascade with the topics
        let topics = sqlx::query("DELETE FROM topics WHERE author_key = $1")
            .bind(&author_key)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?
            .rows_affected();

        let comments = sqlx::query("DELETE FROM comments WHERE author_key = $1")
            .bind(&author_key)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?
            .rows_affected();

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(id));
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(AccountPurge { topics, comments })
    }

    #[instrument(skip(self))]
    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        let result: Option<(Option<String>,)> =
            sqlx::query_as("SELECT password_hash FROM users WHERE id = $1")
                .bind(id.into_inner())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_error)?;

        Ok(result.and_then(|(hash,)| hash))
    }

    #[instrument(skip(self))]
    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );
        let results = sqlx::query_as::<_, UserModel>(&sql)
            .bind(limit.clamp(1, 100))
            .bind(offset.max(0))
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        results.into_iter().map(User::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgUserRepository>();
    }

    #[test]
    fn test_user_conflict_by_constraint() {
        assert!(matches!(
            user_conflict(Some("users_email_key")),
            DomainError::EmailAlreadyExists
        ));
        assert!(matches!(
            user_conflict(Some("users_nickname_key")),
            DomainError::NicknameTaken
        ));
    }
}
