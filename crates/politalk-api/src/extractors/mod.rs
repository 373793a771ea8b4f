//! Axum extractors for request handling
//!
//! Custom extractors for authentication, acting identity, path ids,
//! query strings, and validated bodies.

mod auth;
mod path;
mod query;
mod validated;

pub use auth::{ActingIdentity, AuthUser, OptionalIdentity};
pub use path::SnowflakeId;
pub use query::{ApiQuery, PageQuery};
pub use validated::{OptionalValidatedJson, ValidatedJson};
