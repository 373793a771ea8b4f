//! User entity <-> model mapper

use politalk_core::entities::{AuthProvider, User, UserRole};
use politalk_core::error::DomainError;
use politalk_core::value_objects::Snowflake;

use super::corrupt;
use crate::models::UserModel;

/// Convert UserModel to User entity
impl TryFrom<UserModel> for User {
    type Error = DomainError;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        let role = UserRole::parse(&model.role).ok_or_else(|| corrupt("users.role", &model.role))?;
        let provider = AuthProvider::parse(&model.provider)
            .ok_or_else(|| corrupt("users.provider", &model.provider))?;

        Ok(User {
            id: Snowflake::new(model.id),
            nickname: model.nickname,
            email: model.email,
            avatar_url: model.avatar_url,
            role,
            provider,
            external_id: model.external_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Convert User entity reference to values for database insertion
pub struct UserInsert<'a> {
    pub id: i64,
    pub nickname: &'a str,
    pub email: Option<&'a str>,
    pub password_hash: Option<&'a str>,
    pub avatar_url: Option<&'a str>,
    pub role: &'static str,
    pub provider: &'static str,
    pub external_id: Option<&'a str>,
}

impl<'a> UserInsert<'a> {
    pub fn new(user: &'a User, password_hash: Option<&'a str>) -> Self {
        Self {
            id: user.id.into_inner(),
            nickname: &user.nickname,
            email: user.email.as_deref(),
            password_hash,
            avatar_url: user.avatar_url.as_deref(),
            role: user.role.as_str(),
            provider: user.provider.as_str(),
            external_id: user.external_id.as_deref(),
        }
    }
}

/// Convert User entity reference to values for database update
pub struct UserUpdate<'a> {
    pub id: i64,
    pub nickname: &'a str,
    pub avatar_url: Option<&'a str>,
}

impl<'a> UserUpdate<'a> {
    pub fn new(user: &'a User) -> Self {
        Self {
            id: user.id.into_inner(),
            nickname: &user.nickname,
            avatar_url: user.avatar_url.as_deref(),
        }
    }
}
