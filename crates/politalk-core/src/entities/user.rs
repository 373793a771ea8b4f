//! User entity - a signed-in account

use chrono::{DateTime, Utc};

use crate::value_objects::{Identity, Snowflake};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Self::User),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// How the account signs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AuthProvider {
    #[default]
    Email,
    Kakao,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Kakao => "kakao",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "email" => Some(Self::Email),
            "kakao" => Some(Self::Kakao),
            _ => None,
        }
    }
}

/// User entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub nickname: String,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub role: UserRole,
    pub provider: AuthProvider,
    /// Provider-side account id (`kakao_<id>`), unset for email accounts
    pub external_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create an email/password account
    pub fn new(id: Snowflake, nickname: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            nickname,
            email: Some(email),
            avatar_url: None,
            role: UserRole::User,
            provider: AuthProvider::Email,
            external_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create an account backed by a social login provider
    pub fn new_social(
        id: Snowflake,
        nickname: String,
        provider: AuthProvider,
        external_id: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            nickname,
            email: None,
            avatar_url: None,
            role: UserRole::User,
            provider,
            external_id: Some(external_id),
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    #[inline]
    pub fn identity(&self) -> Identity {
        Identity::Member(self.id)
    }

    pub fn set_nickname(&mut self, nickname: String) {
        self.nickname = nickname;
        self.updated_at = Utc::now();
    }

    pub fn set_avatar(&mut self, avatar_url: Option<String>) {
        self.avatar_url = avatar_url;
        self.updated_at = Utc::now();
    }

    pub fn set_role(&mut self, role: UserRole) {
        self.role = role;
        self.updated_at = Utc::now();
    }
}
