//! Path parameter extractors
//!
//! Type-safe extraction of Snowflake IDs from path parameters.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use politalk_core::Snowflake;

use crate::response::ApiError;

/// A single Snowflake ID taken from the route, e.g. `/topics/:topic_id`
#[derive(Debug, Clone, Copy)]
pub struct SnowflakeId(pub Snowflake);

#[async_trait]
impl<S> FromRequestParts<S> for SnowflakeId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        parse_id(&raw).map(SnowflakeId)
    }
}

fn parse_id(raw: &str) -> Result<Snowflake, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path(format!("Invalid id format: {raw}")))
}
