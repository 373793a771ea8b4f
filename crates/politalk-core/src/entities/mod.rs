//! Domain entities - core business objects

mod alias;
mod comment;
mod notification;
mod reaction;
mod topic;
mod user;
mod vote;

pub use alias::{AnonymousAlias, ANONYMOUS_LABEL_PREFIX};
pub use comment::{Comment, ReportOutcome, Visibility, BLIND_THRESHOLD, MAX_COMMENT_IMAGES};
pub use notification::{Notification, NotificationKind};
pub use reaction::{Reaction, ReactionChange, ReactionKind, ReactionOutcome, ReactionTally};
pub use topic::{
    Category, Topic, TopicOption, TopicWithActivity, MAX_OPTIONS, MAX_TOPIC_IMAGES, MIN_OPTIONS,
};
pub use user::{AuthProvider, User, UserRole};
pub use vote::{VoteCancellation, VoteRecord};
