//! Refresh-token sessions for signed-in users.

mod refresh_token;

pub use refresh_token::{RefreshTokenData, RefreshTokenStore};
