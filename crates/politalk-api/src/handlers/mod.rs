//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod admin;
pub mod auth;
pub mod comments;
pub mod health;
pub mod notifications;
pub mod reactions;
pub mod topics;
pub mod uploads;
pub mod users;
pub mod votes;
