//! Topic entity - a poll with 2 to 6 options, each with its own comment thread

use chrono::{DateTime, Utc};

use crate::value_objects::{Identity, Snowflake};

/// Minimum number of options on a topic
pub const MIN_OPTIONS: usize = 2;

/// Maximum number of options on a topic
pub const MAX_OPTIONS: usize = 6;

/// Maximum number of body images on a topic
pub const MAX_TOPIC_IMAGES: usize = 8;

/// Topic category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    Politics,
    Society,
    Economy,
    International,
    Entertainment,
    Sports,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Self::Politics,
        Self::Society,
        Self::Economy,
        Self::International,
        Self::Entertainment,
        Self::Sports,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Politics => "politics",
            Self::Society => "society",
            Self::Economy => "economy",
            Self::International => "international",
            Self::Entertainment => "entertainment",
            Self::Sports => "sports",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

/// One selectable choice within a topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicOption {
    pub label: String,
    pub image_url: Option<String>,
    pub vote_count: i64,
}

impl TopicOption {
    pub fn new(label: String, image_url: Option<String>) -> Self {
        Self {
            label,
            image_url,
            vote_count: 0,
        }
    }

    /// Fallback label for options submitted without text ("Option 1", ...)
    pub fn default_label(index: usize) -> String {
        format!("Option {}", index + 1)
    }
}

/// Topic entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub id: Snowflake,
    pub title: String,
    pub body: String,
    pub category: Category,
    pub options: Vec<TopicOption>,
    pub image_urls: Vec<String>,
    pub thumbnail_url: Option<String>,
    pub pinned: bool,
    pub report_count: i32,
    pub view_count: i64,
    pub author: Option<Identity>,
    pub created_at: DateTime<Utc>,
    pub deadline: Option<DateTime<Utc>>,
}

impl Topic {
    pub fn new(
        id: Snowflake,
        title: String,
        body: String,
        category: Category,
        options: Vec<TopicOption>,
        author: Option<Identity>,
    ) -> Self {
        Self {
            id,
            title,
            body,
            category,
            options,
            image_urls: Vec::new(),
            thumbnail_url: None,
            pinned: false,
            report_count: 0,
            view_count: 0,
            author,
            created_at: Utc::now(),
            deadline: None,
        }
    }

    #[inline]
    pub fn has_option(&self, index: usize) -> bool {
        index < self.options.len()
    }

    #[inline]
    pub fn is_author(&self, identity: &Identity) -> bool {
        self.author.as_ref() == Some(identity)
    }

    /// Whether voting has closed at `now`
    pub fn is_closed(&self, now: DateTime<Utc>) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    pub fn total_votes(&self) -> i64 {
        self.options.iter().map(|o| o.vote_count).sum()
    }

    /// Rounded share of votes per option, in percent
    pub fn vote_percentages(&self) -> Vec<u32> {
        let total = self.total_votes();
        self.options
            .iter()
            .map(|option| {
                if total <= 0 {
                    0
                } else {
                    ((option.vote_count as f64 / total as f64) * 100.0).round() as u32
                }
            })
            .collect()
    }

    /// Overwrite an option's tally with a freshly read value
    pub fn set_vote_count(&mut self, index: usize, vote_count: i64) {
        if let Some(option) = self.options.get_mut(index) {
            option.vote_count = vote_count;
        }
    }
}

/// A topic with its comment count, used for popularity ranking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicWithActivity {
    pub topic: Topic,
    pub comment_count: i64,
}

impl TopicWithActivity {
    pub fn popularity(&self) -> i64 {
        crate::policy::popularity(self.topic.view_count, self.comment_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn topic(counts: &[i64]) -> Topic {
        let options = counts
            .iter()
            .enumerate()
            .map(|(i, &c)| TopicOption {
                vote_count: c,
                ..TopicOption::new(TopicOption::default_label(i), None)
            })
            .collect();
        Topic::new(
            Snowflake::new(1),
            "Should the city ban cars downtown?".into(),
            String::new(),
            Category::Society,
            options,
            Some(Identity::Member(Snowflake::new(10))),
        )
    }

    #[test]
    fn test_percentages_round() {
        let t = topic(&[1, 2]);
        assert_eq!(t.vote_percentages(), vec![33, 67]);
        assert_eq!(t.total_votes(), 3);
    }

    #[test]
    fn test_percentages_without_votes() {
        assert_eq!(topic(&[0, 0, 0]).vote_percentages(), vec![0, 0, 0]);
    }

    #[test]
    fn test_has_option() {
        let t = topic(&[0, 0]);
        assert!(t.has_option(1));
        assert!(!t.has_option(2));
    }

    #[test]
    fn test_is_author() {
        let t = topic(&[0, 0]);
        assert!(t.is_author(&Identity::Member(Snowflake::new(10))));
        assert!(!t.is_author(&Identity::Member(Snowflake::new(11))));
    }

    #[test]
    fn test_deadline() {
        let mut t = topic(&[0, 0]);
        let now = Utc::now();
        assert!(!t.is_closed(now));

        t.deadline = Some(now - Duration::minutes(1));
        assert!(t.is_closed(now));

        t.deadline = Some(now + Duration::minutes(1));
        assert!(!t.is_closed(now));
    }

    #[test]
    fn test_category_parse() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
        assert_eq!(Category::parse("all"), None);
    }

    #[test]
    fn test_default_label() {
        assert_eq!(TopicOption::default_label(0), "Option 1");
    }
}
