//! Database models - SQLx-compatible structs for PostgreSQL tables

mod alias;
mod comment;
mod notification;
mod reaction;
mod topic;
mod user;
mod vote;

pub use alias::AnonymousAliasModel;
pub use comment::{CommentModel, ReactionCountsModel, ReportStateModel};
pub use notification::NotificationModel;
pub use reaction::ReactionModel;
pub use topic::{TopicActivityModel, TopicModel, TopicOptionModel};
pub use user::UserModel;
pub use vote::VoteModel;
