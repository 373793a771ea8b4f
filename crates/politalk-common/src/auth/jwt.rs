//! JWT tokens for members and anonymous visitors
//!
//! Members get an access/refresh pair. Anonymous visitors get one long-lived
//! token whose subject is a server-generated [`AnonymousId`]; because it is
//! signed, a client cannot claim someone else's anonymous identity.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use politalk_core::{AnonymousId, Identity, Snowflake};
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
    Anonymous,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id for member tokens, anonymous id for anonymous tokens
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub token_type: TokenType,
    /// Ties access and refresh tokens to a stored refresh session
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl Claims {
    /// # Errors
    /// Returns `InvalidToken` if this is not a member token or the subject is malformed
    pub fn user_id(&self) -> Result<Snowflake, AppError> {
        if self.token_type == TokenType::Anonymous {
            return Err(AppError::InvalidToken);
        }
        Snowflake::parse(&self.sub).map_err(|_| AppError::InvalidToken)
    }

    /// # Errors
    /// Returns `InvalidToken` if this is not an anonymous token or the subject is malformed
    pub fn anonymous_id(&self) -> Result<AnonymousId, AppError> {
        if self.token_type != TokenType::Anonymous {
            return Err(AppError::InvalidToken);
        }
        AnonymousId::parse(&self.sub).map_err(|_| AppError::InvalidToken)
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Access and refresh tokens handed to a signed-in member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Token identifying an anonymous visitor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymousToken {
    pub anonymous_id: AnonymousId,
    pub token: String,
    pub expires_in: i64,
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
    anonymous_token_expiry: i64,
}

impl JwtService {
    pub fn new(
        secret: &str,
        access_token_expiry: i64,
        refresh_token_expiry: i64,
        anonymous_token_expiry: i64,
    ) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expiry,
            refresh_token_expiry,
            anonymous_token_expiry,
        }
    }

    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(
            &config.secret,
            config.access_token_expiry,
            config.refresh_token_expiry,
            config.anonymous_token_expiry,
        )
    }

    /// # Errors
    /// Returns an error if token encoding fails
    pub fn generate_token_pair(
        &self,
        user_id: Snowflake,
        session_id: Option<String>,
    ) -> Result<TokenPair, AppError> {
        let subject = user_id.to_string();
        let access_token = self.encode_token(&subject, TokenType::Access, session_id.clone())?;
        let refresh_token = self.encode_token(&subject, TokenType::Refresh, session_id)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }

    /// Issue a token for a brand new anonymous identity
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue_anonymous_token(&self) -> Result<AnonymousToken, AppError> {
        let anonymous_id = AnonymousId::generate();
        let token = self.encode_token(&anonymous_id.to_string(), TokenType::Anonymous, None)?;

        Ok(AnonymousToken {
            anonymous_id,
            token,
            expires_in: self.anonymous_token_expiry,
        })
    }

    fn encode_token(
        &self,
        subject: &str,
        token_type: TokenType,
        session_id: Option<String>,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let expiry = match token_type {
            TokenType::Access => self.access_token_expiry,
            TokenType::Refresh => self.refresh_token_expiry,
            TokenType::Anonymous => self.anonymous_token_expiry,
        };

        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(expiry)).timestamp(),
            token_type,
            session_id,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode JWT: {e}")))
    }

    /// # Errors
    /// Returns `TokenExpired` or `InvalidToken`
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            })
    }

    fn decode_expecting(&self, token: &str, expected: TokenType) -> Result<Claims, AppError> {
        let claims = self.decode_token(token)?;
        if claims.token_type != expected {
            return Err(AppError::InvalidToken);
        }
        Ok(claims)
    }

    /// # Errors
    /// Returns an error unless `token` is a valid access token
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AppError> {
        self.decode_expecting(token, TokenType::Access)
    }

    /// # Errors
    /// Returns an error unless `token` is a valid refresh token
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, AppError> {
        self.decode_expecting(token, TokenType::Refresh)
    }

    /// # Errors
    /// Returns an error unless `token` is a valid anonymous token
    pub fn validate_anonymous_token(&self, token: &str) -> Result<AnonymousId, AppError> {
        self.decode_expecting(token, TokenType::Anonymous)?.anonymous_id()
    }

    /// Identity carried by a bearer token: access tokens act as the member,
    /// anonymous tokens as the anonymous identity. Refresh tokens are rejected.
    ///
    /// # Errors
    /// Returns an error for invalid, expired, or refresh tokens
    pub fn resolve_identity(&self, token: &str) -> Result<Identity, AppError> {
        let claims = self.decode_token(token)?;
        match claims.token_type {
            TokenType::Access => claims.user_id().map(Identity::Member),
            TokenType::Anonymous => claims.anonymous_id().map(Identity::Anonymous),
            TokenType::Refresh => Err(AppError::InvalidToken),
        }
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .field("anonymous_token_expiry", &self.anonymous_token_expiry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("test-secret-key-that-is-long-enough", 900, 604_800, 86_400)
    }

    #[test]
    fn test_member_token_pair() {
        let jwt = service();
        let user_id = Snowflake::new(12345);
        let pair = jwt
            .generate_token_pair(user_id, Some("session-1".into()))
            .unwrap();

        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 900);

        let access = jwt.validate_access_token(&pair.access_token).unwrap();
        assert_eq!(access.user_id().unwrap(), user_id);
        assert_eq!(access.session_id.as_deref(), Some("session-1"));

        let refresh = jwt.validate_refresh_token(&pair.refresh_token).unwrap();
        assert_eq!(refresh.user_id().unwrap(), user_id);

        assert!(jwt.validate_access_token(&pair.refresh_token).is_err());
        assert!(jwt.validate_refresh_token(&pair.access_token).is_err());
    }

    #[test]
    fn test_anonymous_token_roundtrip() {
        let jwt = service();
        let issued = jwt.issue_anonymous_token().unwrap();

        assert_eq!(issued.expires_in, 86_400);
        assert_eq!(
            jwt.validate_anonymous_token(&issued.token).unwrap(),
            issued.anonymous_id
        );
        assert!(jwt.validate_access_token(&issued.token).is_err());
    }

    #[test]
    fn test_each_anonymous_token_is_a_new_identity() {
        let jwt = service();
        let a = jwt.issue_anonymous_token().unwrap();
        let b = jwt.issue_anonymous_token().unwrap();
        assert_ne!(a.anonymous_id, b.anonymous_id);
    }

    #[test]
    fn test_resolve_identity() {
        let jwt = service();
        let pair = jwt.generate_token_pair(Snowflake::new(7), None).unwrap();
        let anon = jwt.issue_anonymous_token().unwrap();

        assert_eq!(
            jwt.resolve_identity(&pair.access_token).unwrap(),
            Identity::Member(Snowflake::new(7))
        );
        assert_eq!(
            jwt.resolve_identity(&anon.token).unwrap(),
            Identity::Anonymous(anon.anonymous_id)
        );
        assert!(matches!(
            jwt.resolve_identity(&pair.refresh_token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_forged_signature_is_rejected() {
        let other = JwtService::new("a-completely-different-secret!!", 900, 900, 900);
        let forged = other.issue_anonymous_token().unwrap();
        assert!(matches!(
            service().resolve_identity(&forged.token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_garbage_token() {
        assert!(matches!(
            service().decode_token("invalid.token.here"),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_claims_kind_checks() {
        let claims = Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            iat: 0,
            exp: i64::MAX,
            token_type: TokenType::Anonymous,
            session_id: None,
        };
        assert!(claims.anonymous_id().is_ok());
        assert!(claims.user_id().is_err());
    }
}
