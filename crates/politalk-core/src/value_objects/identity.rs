//! Acting identity - who is voting, commenting, or reacting
//!
//! Signed-in users act as [`Identity::Member`]. Visitors without an account
//! act as [`Identity::Anonymous`] using an id the server issued to them inside
//! a signed token, so the id cannot be forged by the client.
//!
//! Storage uses the canonical key form: `u:<snowflake>` or `a:<uuid>`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::Snowflake;

const MEMBER_PREFIX: &str = "u:";
const ANONYMOUS_PREFIX: &str = "a:";

/// Server-issued pseudonymous identifier for a visitor without an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AnonymousId(Uuid);

impl AnonymousId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn parse(s: &str) -> Result<Self, IdentityParseError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| IdentityParseError::InvalidAnonymousId)
    }
}

impl fmt::Display for AnonymousId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdentityParseError {
    #[error("identity key must start with 'u:' or 'a:'")]
    UnknownKind,

    #[error("invalid member id in identity key")]
    InvalidMemberId,

    #[error("invalid anonymous id")]
    InvalidAnonymousId,
}

/// The identity a request acts as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Identity {
    Member(Snowflake),
    Anonymous(AnonymousId),
}

impl Identity {
    /// Canonical storage key
    pub fn key(&self) -> String {
        match self {
            Self::Member(id) => format!("{MEMBER_PREFIX}{id}"),
            Self::Anonymous(id) => format!("{ANONYMOUS_PREFIX}{id}"),
        }
    }

    pub fn parse_key(key: &str) -> Result<Self, IdentityParseError> {
        if let Some(rest) = key.strip_prefix(MEMBER_PREFIX) {
            Snowflake::parse(rest)
                .map(Self::Member)
                .map_err(|_| IdentityParseError::InvalidMemberId)
        } else if let Some(rest) = key.strip_prefix(ANONYMOUS_PREFIX) {
            AnonymousId::parse(rest).map(Self::Anonymous)
        } else {
            Err(IdentityParseError::UnknownKind)
        }
    }

    #[inline]
    pub fn member_id(&self) -> Option<Snowflake> {
        match self {
            Self::Member(id) => Some(*id),
            Self::Anonymous(_) => None,
        }
    }

    #[inline]
    pub fn anonymous_id(&self) -> Option<AnonymousId> {
        match self {
            Self::Anonymous(id) => Some(*id),
            Self::Member(_) => None,
        }
    }

    #[inline]
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous(_))
    }
}

impl From<Snowflake> for Identity {
    fn from(id: Snowflake) -> Self {
        Self::Member(id)
    }
}

impl From<AnonymousId> for Identity {
    fn from(id: AnonymousId) -> Self {
        Self::Anonymous(id)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl FromStr for Identity {
    type Err = IdentityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_key(s)
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key())
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Self::parse_key(&key).map_err(serde::de::Error::custom)
    }
}
