//! Entity to model mappers
//!
//! This module provides conversions between domain entities (politalk-core) and database models.
//! - `TryFrom<Model> for Entity`: Convert database rows to domain objects. Rows whose
//!   text columns no longer parse (identity keys, enum names) surface as `DatabaseError`.
//! - `*Insert` structs: Prepare entity data for database operations

mod alias;
mod comment;
mod notification;
mod reaction;
mod topic;
mod user;
mod vote;

pub use comment::CommentInsert;
pub use notification::NotificationInsert;
pub use topic::{topic_with_options, TopicInsert, TopicOptionInsert};
pub use user::{UserInsert, UserUpdate};

use politalk_core::error::DomainError;
use politalk_core::value_objects::Identity;

/// Error for a stored value that does not parse back into its domain type
pub(crate) fn corrupt(column: &str, value: &str) -> DomainError {
    DomainError::DatabaseError(format!("invalid value in {column}: {value:?}"))
}

/// Parse a stored identity key (`u:<id>` or `a:<uuid>`)
pub(crate) fn identity_from_key(column: &str, key: &str) -> Result<Identity, DomainError> {
    Identity::parse_key(key).map_err(|_| corrupt(column, key))
}

/// Stored option positions are never negative
pub(crate) fn option_index(column: &str, value: i32) -> Result<usize, DomainError> {
    usize::try_from(value).map_err(|_| corrupt(column, &value.to_string()))
}

/// Convert an option index for binding
pub(crate) fn option_position(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}
