//! Comment gate - who may write in an option's thread
//!
//! An identity may post a top-level comment or react in option `k` when it
//! wrote the topic or its active vote is for `k`. Replies skip the option
//! check entirely.

use crate::entities::{Comment, Topic, VoteRecord};
use crate::error::DomainError;
use crate::value_objects::Identity;

/// Where a new comment goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentTarget {
    /// A top-level comment in the given option's thread
    Option(usize),
    /// A reply to an existing comment
    Reply,
}

pub fn can_comment(
    identity: &Identity,
    topic: &Topic,
    vote: Option<&VoteRecord>,
    target: CommentTarget,
) -> bool {
    match target {
        CommentTarget::Reply => true,
        CommentTarget::Option(option_index) => can_react(identity, topic, vote, option_index),
    }
}

/// Reactions follow the top-level rule, with no reply exemption
pub fn can_react(
    identity: &Identity,
    topic: &Topic,
    vote: Option<&VoteRecord>,
    option_index: usize,
) -> bool {
    if topic.is_author(identity) {
        return true;
    }
    vote.is_some_and(|v| v.topic_id == topic.id && v.voter == *identity && v.is_for(option_index))
}

pub fn ensure_can_comment(
    identity: &Identity,
    topic: &Topic,
    vote: Option<&VoteRecord>,
    target: CommentTarget,
) -> Result<(), DomainError> {
    if can_comment(identity, topic, vote, target) {
        return Ok(());
    }
    let option_index = match target {
        CommentTarget::Option(index) => index,
        CommentTarget::Reply => 0,
    };
    Err(DomainError::VoteRequired { option_index })
}

pub fn ensure_can_react(
    identity: &Identity,
    topic: &Topic,
    vote: Option<&VoteRecord>,
    option_index: usize,
) -> Result<(), DomainError> {
    if can_react(identity, topic, vote, option_index) {
        Ok(())
    } else {
        Err(DomainError::VoteRequired { option_index })
    }
}

/// Authors can always delete their own comments; admins can delete any
pub fn can_delete(identity: &Identity, comment: &Comment, is_admin: bool) -> bool {
    is_admin || comment.is_authored_by(identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Category, TopicOption};
    use crate::value_objects::{AnonymousId, Snowflake};

    fn topic_by(author: Option<Identity>) -> Topic {
        Topic::new(
            Snowflake::new(1),
            "A or B".into(),
            String::new(),
            Category::Other,
            vec![
                TopicOption::new("A".into(), None),
                TopicOption::new("B".into(), None),
            ],
            author,
        )
    }

    #[test]
    fn test_voter_can_only_comment_in_own_option() {
        let topic = topic_by(None);
        let x = Identity::Anonymous(AnonymousId::generate());
        let vote = VoteRecord::new(topic.id, x, 0);

        assert!(can_comment(&x, &topic, Some(&vote), CommentTarget::Option(0)));
        assert!(!can_comment(&x, &topic, Some(&vote), CommentTarget::Option(1)));
    }

    #[test]
    fn test_non_voter_is_denied() {
        let topic = topic_by(None);
        let x = Identity::Member(Snowflake::new(3));
        assert!(!can_comment(&x, &topic, None, CommentTarget::Option(0)));
        assert!(matches!(
            ensure_can_comment(&x, &topic, None, CommentTarget::Option(1)),
            Err(DomainError::VoteRequired { option_index: 1 })
        ));
    }

    #[test]
    fn test_topic_author_can_comment_anywhere() {
        let author = Identity::Member(Snowflake::new(9));
        let topic = topic_by(Some(author));
        for index in 0..topic.options.len() {
            assert!(can_comment(&author, &topic, None, CommentTarget::Option(index)));
            assert!(can_react(&author, &topic, None, index));
        }
    }

    #[test]
    fn test_replies_bypass_option_check() {
        let topic = topic_by(None);
        let stranger = Identity::Anonymous(AnonymousId::generate());
        assert!(can_comment(&stranger, &topic, None, CommentTarget::Reply));
    }

    #[test]
    fn test_reactions_have_no_reply_exemption() {
        let topic = topic_by(None);
        let x = Identity::Member(Snowflake::new(4));
        let vote = VoteRecord::new(topic.id, x, 1);

        assert!(can_react(&x, &topic, Some(&vote), 1));
        assert!(!can_react(&x, &topic, Some(&vote), 0));
        assert!(!can_react(&x, &topic, None, 1));
    }

    #[test]
    fn test_vote_of_another_identity_does_not_count() {
        let topic = topic_by(None);
        let x = Identity::Member(Snowflake::new(4));
        let y = Identity::Member(Snowflake::new(5));
        let vote_by_y = VoteRecord::new(topic.id, y, 0);
        assert!(!can_comment(&x, &topic, Some(&vote_by_y), CommentTarget::Option(0)));
    }

    #[test]
    fn test_delete_rights() {
        let author = Identity::Anonymous(AnonymousId::generate());
        let other = Identity::Member(Snowflake::new(8));
        let comment = Comment::new(Snowflake::new(50), Snowflake::new(1), 0, author, "hi".into());

        assert!(can_delete(&author, &comment, false));
        assert!(!can_delete(&other, &comment, false));
        assert!(can_delete(&other, &comment, true));
    }
}
