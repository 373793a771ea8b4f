//! Comment entity - a post in one option's thread, optionally a reply

use chrono::{DateTime, Utc};

use super::ReactionTally;
use crate::value_objects::{Identity, Snowflake};

/// Reports at which a comment is blinded
pub const BLIND_THRESHOLD: i32 = 5;

/// Maximum number of images attached to one comment
pub const MAX_COMMENT_IMAGES: usize = 4;

/// Whether a comment is shown normally or hidden after reports.
///
/// `Visible -> Blinded` happens automatically at [`BLIND_THRESHOLD`] reports.
/// Only an admin restore goes back to `Visible`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Blinded,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Blinded => "blinded",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "visible" => Some(Self::Visible),
            "blinded" => Some(Self::Blinded),
            _ => None,
        }
    }

    /// Visibility after the report count reached `report_count`
    pub fn after_reports(self, report_count: i32) -> Self {
        if report_count >= BLIND_THRESHOLD {
            Self::Blinded
        } else {
            self
        }
    }
}

/// Comment entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: Snowflake,
    pub topic_id: Snowflake,
    pub option_index: usize,
    pub parent_id: Option<Snowflake>,
    pub author: Identity,
    pub body: String,
    pub image_urls: Vec<String>,
    pub reactions: ReactionTally,
    pub report_count: i32,
    pub visibility: Visibility,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Create a top-level comment in an option's thread
    pub fn new(
        id: Snowflake,
        topic_id: Snowflake,
        option_index: usize,
        author: Identity,
        body: String,
    ) -> Self {
        Self {
            id,
            topic_id,
            option_index,
            parent_id: None,
            author,
            body,
            image_urls: Vec::new(),
            reactions: ReactionTally::default(),
            report_count: 0,
            visibility: Visibility::Visible,
            created_at: Utc::now(),
        }
    }

    /// Create a reply. Replies live in the parent's thread.
    pub fn new_reply(id: Snowflake, parent: &Comment, author: Identity, body: String) -> Self {
        Self {
            parent_id: Some(parent.id),
            ..Self::new(id, parent.topic_id, parent.option_index, author, body)
        }
    }

    #[inline]
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    #[inline]
    pub fn is_blinded(&self) -> bool {
        self.visibility == Visibility::Blinded
    }

    #[inline]
    pub fn is_authored_by(&self, identity: &Identity) -> bool {
        self.author == *identity
    }

    #[inline]
    pub fn score(&self) -> i64 {
        self.reactions.score()
    }

    /// Count one more report. Returns true when this report blinded the comment.
    pub fn record_report(&mut self) -> bool {
        let was_blinded = self.is_blinded();
        self.report_count += 1;
        self.visibility = self.visibility.after_reports(self.report_count);
        !was_blinded && self.is_blinded()
    }

    /// Admin reset back to visible with a clean report count
    pub fn restore(&mut self) {
        self.report_count = 0;
        self.visibility = Visibility::Visible;
    }
}

/// Stored result of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOutcome {
    pub report_count: i32,
    pub visibility: Visibility,
    /// True only for the report that crossed the threshold
    pub newly_blinded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment() -> Comment {
        Comment::new(
            Snowflake::new(100),
            Snowflake::new(1),
            0,
            Identity::Member(Snowflake::new(5)),
            "Cars make downtown unsafe".into(),
        )
    }

    #[test]
    fn test_blinds_at_threshold_and_stays_blinded() {
        let mut c = comment();
        for _ in 0..BLIND_THRESHOLD - 1 {
            assert!(!c.record_report());
            assert_eq!(c.visibility, Visibility::Visible);
        }

        assert!(c.record_report());
        assert!(c.is_blinded());

        // further reports never flip it back
        for _ in 0..3 {
            assert!(!c.record_report());
            assert!(c.is_blinded());
        }
    }

    #[test]
    fn test_restore_resets() {
        let mut c = comment();
        for _ in 0..BLIND_THRESHOLD {
            c.record_report();
        }
        c.restore();
        assert_eq!(c.visibility, Visibility::Visible);
        assert_eq!(c.report_count, 0);
    }

    #[test]
    fn test_reply_inherits_thread() {
        let parent = Comment {
            option_index: 1,
            ..comment()
        };
        let reply = Comment::new_reply(
            Snowflake::new(101),
            &parent,
            Identity::Member(Snowflake::new(6)),
            "Disagree".into(),
        );
        assert!(reply.is_reply());
        assert_eq!(reply.option_index, 1);
        assert_eq!(reply.topic_id, parent.topic_id);
        assert_eq!(reply.parent_id, Some(parent.id));
    }

    #[test]
    fn test_visibility_parse() {
        assert_eq!(Visibility::parse("blinded"), Some(Visibility::Blinded));
        assert_eq!(Visibility::parse("hidden"), None);
    }
}
