//! Policy rules - pure decisions shared by the services and the repositories
//!
//! Nothing here performs I/O. The services load state, ask these rules, and
//! the repositories apply the result atomically.

mod aliases;
pub mod gate;
pub mod ledger;
mod ranking;

pub use aliases::AliasAllocator;
pub use gate::CommentTarget;
pub use ranking::{
    popularity, rank_hot, select_best, HotWindow, BEST_COMMENT_LIMIT, COMMENT_WEIGHT,
    HOT_TOPIC_LIMIT,
};
