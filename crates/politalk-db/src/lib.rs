//! # politalk-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for all repository traits
//! defined in `politalk-core`. It handles:
//!
//! - Connection pool management and migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations
//!
//! Vote tallies, reaction counters, and report counts are only ever changed
//! inside a transaction together with the row that justifies the change.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use politalk_db::pool::{create_pool, run_migrations, PoolConfig};
//! use politalk_db::repositories::PgTopicRepository;
//! use politalk_core::traits::TopicRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PoolConfig::from_env();
//!     let pool = create_pool(&config).await?;
//!     run_migrations(&pool, None).await?;
//!     let topic_repo = PgTopicRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, run_migrations, PgPool, PoolConfig};
pub use repositories::{
    PgAnonymousAliasRepository, PgCommentRepository, PgNotificationRepository,
    PgReactionRepository, PgTopicRepository, PgUserRepository, PgVoteRepository,
};
