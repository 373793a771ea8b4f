//! Value objects - immutable types that represent domain concepts

mod identity;
mod snowflake;

pub use identity::{AnonymousId, Identity, IdentityParseError};
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
