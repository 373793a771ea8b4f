//! Authentication extractors
//!
//! `AuthUser` requires a member access token. `ActingIdentity` also accepts
//! the server-issued anonymous token, so visitors can vote, comment, and
//! react without an account.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use politalk_core::{Identity, Snowflake};

use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated member extracted from an access token
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// User ID from the JWT token
    pub user_id: Snowflake,
}

impl AuthUser {
    /// Create a new AuthUser
    pub fn new(user_id: Snowflake) -> Self {
        Self { user_id }
    }

    pub fn identity(&self) -> Identity {
        Identity::Member(self.user_id)
    }
}

async fn bearer_token<S>(parts: &mut Parts, state: &S) -> Option<String>
where
    S: Send + Sync,
{
    TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
        .await
        .ok()
        .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string())
}

fn resolve(state: &AppState, token: &str) -> Result<Identity, ApiError> {
    state.jwt_service().resolve_identity(token).map_err(|e| {
        tracing::warn!(error = %e, "Invalid identity token");
        ApiError::App(e)
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts, state)
            .await
            .ok_or(ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);

        // Validate the token
        let claims = app_state
            .jwt_service()
            .validate_access_token(&token)
            .map_err(|e| {
                tracing::warn!(error = %e, "Invalid access token");
                ApiError::InvalidAuthFormat
            })?;

        // Extract user ID from claims
        let user_id = claims.user_id().map_err(|e| {
            tracing::warn!(error = %e, "Invalid user ID in token");
            ApiError::InvalidAuthFormat
        })?;

        Ok(AuthUser::new(user_id))
    }
}

/// Who the request acts as: a member or an anonymous visitor
#[derive(Debug, Clone, Copy)]
pub struct ActingIdentity(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for ActingIdentity
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts, state)
            .await
            .ok_or(ApiError::MissingAuth)?;
        let identity = resolve(&AppState::from_ref(state), &token)?;
        Ok(ActingIdentity(identity))
    }
}

/// Optional acting identity
///
/// Returns None if no authorization header is present,
/// or an error if the token is invalid.
#[derive(Debug, Clone, Copy)]
pub struct OptionalIdentity(pub Option<Identity>);

impl OptionalIdentity {
    pub fn as_ref(&self) -> Option<&Identity> {
        self.0.as_ref()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for OptionalIdentity
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match bearer_token(parts, state).await {
            Some(token) => {
                let identity = resolve(&AppState::from_ref(state), &token)?;
                Ok(OptionalIdentity(Some(identity)))
            }
            None => Ok(OptionalIdentity(None)),
        }
    }
}
