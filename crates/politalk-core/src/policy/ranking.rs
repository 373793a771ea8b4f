//! Topic popularity and best-comment selection

use chrono::{DateTime, Duration, Utc};

use crate::entities::{Comment, TopicWithActivity};

/// How many best comments are surfaced per option
pub const BEST_COMMENT_LIMIT: usize = 3;

/// How many topics the hot list shows
pub const HOT_TOPIC_LIMIT: usize = 5;

/// A comment counts three times as much as a view
pub const COMMENT_WEIGHT: i64 = 3;

/// `views + 3 * comments`
#[inline]
pub fn popularity(view_count: i64, comment_count: i64) -> i64 {
    view_count + COMMENT_WEIGHT * comment_count
}

/// Time window for the hot topic list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HotWindow {
    #[default]
    Day,
    Week,
    Month,
}

impl HotWindow {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            _ => None,
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            Self::Day => Duration::days(1),
            Self::Week => Duration::weeks(1),
            Self::Month => Duration::days(30),
        }
    }

    /// Oldest creation time still inside the window
    pub fn since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.duration()
    }
}

/// Pinned topics first (newest first), then unpinned topics created inside
/// the window by popularity. At most `limit` in total.
pub fn rank_hot(
    candidates: Vec<TopicWithActivity>,
    window: HotWindow,
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<TopicWithActivity> {
    let since = window.since(now);
    let (mut pinned, mut rest): (Vec<_>, Vec<_>) =
        candidates.into_iter().partition(|t| t.topic.pinned);

    pinned.sort_by(|a, b| b.topic.created_at.cmp(&a.topic.created_at));
    rest.retain(|t| t.topic.created_at >= since);
    rest.sort_by(|a, b| {
        b.popularity()
            .cmp(&a.popularity())
            .then_with(|| b.topic.created_at.cmp(&a.topic.created_at))
    });

    pinned.into_iter().chain(rest).take(limit).collect()
}

/// Highest scoring visible top-level comments, older first on ties
pub fn select_best(comments: Vec<Comment>, limit: usize) -> Vec<Comment> {
    let mut eligible: Vec<Comment> = comments
        .into_iter()
        .filter(|c| !c.is_reply() && !c.is_blinded())
        .collect();
    eligible.sort_by(|a, b| {
        b.score()
            .cmp(&a.score())
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
    eligible.truncate(limit);
    eligible
}
