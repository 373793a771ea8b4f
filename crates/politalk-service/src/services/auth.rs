//! Authentication service
//!
//! Handles registration, login (email and Kakao), token refresh, logout,
//! and issuing anonymous identities.

use politalk_cache::RefreshTokenData;
use politalk_common::auth::{hash_password, validate_password_strength, verify_password};
use politalk_common::AppError;
use politalk_core::entities::{AuthProvider, User};
use politalk_core::{DomainError, Snowflake};
use serde::Deserialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::dto::{
    AnonymousTokenResponse, AuthResponse, CurrentUserResponse, KakaoLoginRequest, LoginRequest,
    LogoutRequest, RefreshTokenRequest, RegisterRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Prefix of provider-side ids for Kakao accounts
const KAKAO_UID_PREFIX: &str = "kakao_";

/// Longest nickname taken over from a Kakao profile
const MAX_NICKNAME_CHARS: usize = 20;

/// The part of Kakao's `/v2/user/me` payload we use
#[derive(Debug, Deserialize)]
struct KakaoProfile {
    id: i64,
    #[serde(default)]
    properties: Option<KakaoProperties>,
}

#[derive(Debug, Deserialize)]
struct KakaoProperties {
    nickname: Option<String>,
    profile_image: Option<String>,
}

impl KakaoProfile {
    fn external_id(&self) -> String {
        format!("{KAKAO_UID_PREFIX}{}", self.id)
    }

    fn nickname(&self) -> String {
        self.properties
            .as_ref()
            .and_then(|p| p.nickname.as_deref())
            .map(str::trim)
            .filter(|n| n.chars().count() >= 2)
            .map_or_else(
                || self.external_id(),
                |n| n.chars().take(MAX_NICKNAME_CHARS).collect(),
            )
    }

    fn avatar_url(&self) -> Option<String> {
        self.properties
            .as_ref()
            .and_then(|p| p.profile_image.clone())
    }
}

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register with email and password
    #[instrument(skip(self, request), fields(nickname = %request.nickname, email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
        validate_password_strength(&request.password).map_err(ServiceError::from)?;

        if self.ctx.user_repo().email_exists(&request.email).await? {
            return Err(DomainError::EmailAlreadyExists.into());
        }
        if self.ctx.user_repo().nickname_exists(&request.nickname).await? {
            return Err(DomainError::NicknameTaken.into());
        }

        let password_hash =
            hash_password(&request.password).map_err(|e| ServiceError::internal(e.to_string()))?;

        let user = User::new(self.ctx.generate_id(), request.nickname, request.email);
        self.ctx
            .user_repo()
            .create(&user, Some(&password_hash))
            .await?;

        info!(user_id = %user.id, "User registered successfully");

        self.start_session(&user).await
    }

    /// Login with email and password
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| {
                warn!(email = %request.email, "Login failed: user not found");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        // Social accounts have no password
        let password_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user.id, "Login failed: no password hash");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        let is_valid = verify_password(&request.password, &password_hash)
            .map_err(|e| ServiceError::internal(e.to_string()))?;

        if !is_valid {
            warn!(user_id = %user.id, "Login failed: invalid password");
            return Err(ServiceError::App(AppError::InvalidCredentials));
        }

        info!(user_id = %user.id, "User logged in successfully");

        self.start_session(&user).await
    }

    /// Exchange a Kakao access token for our token pair, creating the
    /// account on first login
    #[instrument(skip(self, request))]
    pub async fn kakao_login(&self, request: KakaoLoginRequest) -> ServiceResult<AuthResponse> {
        let profile = self.fetch_kakao_profile(&request.access_token).await?;
        let external_id = profile.external_id();

        if let Some(user) = self
            .ctx
            .user_repo()
            .find_by_external_id(&external_id)
            .await?
        {
            info!(user_id = %user.id, "Kakao user logged in");
            return self.start_session(&user).await;
        }

        let id = self.ctx.generate_id();
        let mut nickname = profile.nickname();
        if self.ctx.user_repo().nickname_exists(&nickname).await? {
            nickname = disambiguate(&nickname, id);
        }

        let mut user = User::new_social(id, nickname, AuthProvider::Kakao, external_id);
        user.set_avatar(profile.avatar_url());
        self.ctx.user_repo().create(&user, None).await?;

        info!(user_id = %user.id, "Kakao user registered");

        self.start_session(&user).await
    }

    async fn fetch_kakao_profile(&self, access_token: &str) -> ServiceResult<KakaoProfile> {
        let response = self
            .ctx
            .http_client()
            .get(&self.ctx.settings().kakao.profile_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Kakao profile request failed");
                ServiceError::App(AppError::ExternalService("Kakao is unavailable".into()))
            })?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "Kakao rejected the access token");
            return Err(ServiceError::App(AppError::InvalidCredentials));
        }

        response.json::<KakaoProfile>().await.map_err(|e| {
            warn!(error = %e, "Unexpected Kakao profile payload");
            ServiceError::App(AppError::ExternalService(
                "Unexpected Kakao response".into(),
            ))
        })
    }

    /// Rotate a refresh token: the old one is revoked and a new pair issued
    #[instrument(skip(self, request))]
    pub async fn refresh_tokens(&self, request: RefreshTokenRequest) -> ServiceResult<AuthResponse> {
        self.ctx
            .jwt_service()
            .validate_refresh_token(&request.refresh_token)?;

        let refresh_data = self
            .ctx
            .refresh_token_store()
            .get(&request.refresh_token)
            .await
            .map_err(|e| ServiceError::internal(e.to_string()))?
            .ok_or(ServiceError::App(AppError::InvalidToken))?;

        let user = self.ctx.require_user(refresh_data.user_id).await?;

        self.ctx
            .refresh_token_store()
            .revoke(&request.refresh_token)
            .await
            .map_err(|e| ServiceError::internal(e.to_string()))?;

        info!(user_id = %user.id, "Tokens refreshed");

        self.start_session(&user).await
    }

    /// Revoke one refresh token, or every session of the user when none is given
    #[instrument(skip(self, request), fields(user_id = %user_id))]
    pub async fn logout(&self, user_id: Snowflake, request: LogoutRequest) -> ServiceResult<()> {
        let store = self.ctx.refresh_token_store();

        match request.refresh_token {
            Some(token) => {
                let owned = store
                    .get(&token)
                    .await
                    .map_err(|e| ServiceError::internal(e.to_string()))?
                    .is_some_and(|data| data.user_id == user_id);
                if owned {
                    store
                        .revoke(&token)
                        .await
                        .map_err(|e| ServiceError::internal(e.to_string()))?;
                }
            }
            None => {
                let revoked = store
                    .revoke_all_for_user(user_id)
                    .await
                    .map_err(|e| ServiceError::internal(e.to_string()))?;
                info!(revoked, "All sessions revoked");
            }
        }

        info!("User logged out");
        Ok(())
    }

    /// Issue a brand new anonymous identity
    #[instrument(skip(self))]
    pub fn issue_anonymous(&self) -> ServiceResult<AnonymousTokenResponse> {
        let token = self.ctx.jwt_service().issue_anonymous_token()?;

        info!(anonymous_id = %token.anonymous_id, "Anonymous identity issued");

        Ok(AnonymousTokenResponse {
            anonymous_id: token.anonymous_id.to_string(),
            token: token.token,
            token_type: "Bearer".to_string(),
            expires_in: token.expires_in,
        })
    }

    /// Issue a token pair and remember its refresh token
    async fn start_session(&self, user: &User) -> ServiceResult<AuthResponse> {
        let session_id = Uuid::new_v4().to_string();
        let token_pair = self
            .ctx
            .jwt_service()
            .generate_token_pair(user.id, Some(session_id.clone()))
            .map_err(|e| ServiceError::internal(e.to_string()))?;

        let refresh_data = RefreshTokenData::new(user.id, session_id);
        self.ctx
            .refresh_token_store()
            .store(&token_pair.refresh_token, &refresh_data)
            .await
            .map_err(|e| ServiceError::internal(e.to_string()))?;

        Ok(AuthResponse::new(
            token_pair.access_token,
            token_pair.refresh_token,
            token_pair.expires_in,
            CurrentUserResponse::from(user),
        ))
    }
}

/// Make a taken nickname unique with the tail of the new account id
fn disambiguate(nickname: &str, id: Snowflake) -> String {
    let digits = id.to_string();
    let suffix = &digits[digits.len().saturating_sub(4)..];
    let base: String = nickname
        .chars()
        .take(MAX_NICKNAME_CHARS - suffix.len() - 1)
        .collect();
    format!("{base}_{suffix}")
}
