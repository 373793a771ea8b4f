//! Schema migrations, applied at startup

use std::path::Path;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;
use tracing::info;

/// Migrations shipped with this crate
pub const MIGRATIONS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/migrations");

/// Apply pending migrations from `dir` (defaults to [`MIGRATIONS_DIR`])
pub async fn run_migrations(pool: &PgPool, dir: Option<&str>) -> Result<(), MigrateError> {
    let dir = dir.unwrap_or(MIGRATIONS_DIR);
    let migrator = Migrator::new(Path::new(dir)).await?;
    migrator.run(pool).await?;
    info!(dir, "Database migrations applied");
    Ok(())
}
