//! Authentication handlers
//!
//! Endpoints for registration, login (password or Kakao), token refresh,
//! logout, and anonymous identities.

use axum::{extract::State, Json};
use politalk_service::dto::{
    AnonymousTokenResponse, AuthResponse, KakaoLoginRequest, LoginRequest, LogoutRequest,
    RefreshTokenRequest, RegisterRequest,
};
use politalk_service::AuthService;

use crate::extractors::{AuthUser, OptionalValidatedJson, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Register a new user
///
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Created<Json<AuthResponse>>> {
    let service = AuthService::new(state.service_context());
    let response = service.register(request).await?;
    Ok(Created(Json(response)))
}

/// Login with email and password
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.login(request).await?;
    Ok(Json(response))
}

/// Exchange a Kakao access token for our token pair
///
/// POST /auth/kakao
pub async fn kakao_login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<KakaoLoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.kakao_login(request).await?;
    Ok(Json(response))
}

/// Refresh access token
///
/// POST /auth/refresh
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RefreshTokenRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.refresh_tokens(request).await?;
    Ok(Json(response))
}

/// Logout user
///
/// POST /auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    OptionalValidatedJson(request): OptionalValidatedJson<LogoutRequest>,
) -> ApiResult<NoContent> {
    let service = AuthService::new(state.service_context());
    service
        .logout(auth.user_id, request.unwrap_or_default())
        .await?;
    Ok(NoContent)
}

/// Issue a signed anonymous identity
///
/// POST /auth/anonymous
pub async fn anonymous(
    State(state): State<AppState>,
) -> ApiResult<Created<Json<AnonymousTokenResponse>>> {
    let service = AuthService::new(state.service_context());
    let response = service.issue_anonymous()?;
    Ok(Created(Json(response)))
}
