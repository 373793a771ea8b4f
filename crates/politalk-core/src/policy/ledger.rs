//! Vote ledger rules - one reversible choice per identity and topic
//!
//! A vote can be cancelled only while the voter has no comment under the
//! voted option. Tallies are changed by the repository in the same
//! transaction that writes or removes the vote record.

use chrono::{DateTime, Utc};

use crate::entities::{Topic, VoteRecord};
use crate::error::DomainError;

/// Check a new vote against the topic and any vote the identity already holds
pub fn ensure_can_cast(
    topic: &Topic,
    existing: Option<&VoteRecord>,
    option_index: usize,
    now: DateTime<Utc>,
) -> Result<(), DomainError> {
    if existing.is_some() {
        return Err(DomainError::AlreadyVoted);
    }
    if !topic.has_option(option_index) {
        return Err(DomainError::UnknownOption(option_index));
    }
    if topic.is_closed(now) {
        return Err(DomainError::VotingClosed);
    }
    Ok(())
}

/// Check a cancellation. `has_comment` tells whether the voter already
/// commented under the voted option.
pub fn ensure_can_cancel(
    existing: Option<&VoteRecord>,
    has_comment: bool,
) -> Result<&VoteRecord, DomainError> {
    let vote = existing.ok_or(DomainError::NoActiveVote)?;
    if has_comment {
        return Err(DomainError::CommentAlreadyPosted);
    }
    Ok(vote)
}
