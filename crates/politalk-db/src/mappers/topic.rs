//! Topic entity <-> model mapper

use politalk_core::entities::{Category, Topic, TopicOption, TopicWithActivity};
use politalk_core::error::DomainError;
use politalk_core::value_objects::Snowflake;

use super::{corrupt, identity_from_key, option_position};
use crate::models::{TopicActivityModel, TopicModel, TopicOptionModel};

/// Build a Topic from its row and option rows (any order)
pub fn topic_with_options(
    model: TopicModel,
    mut options: Vec<TopicOptionModel>,
) -> Result<Topic, DomainError> {
    let category = Category::parse(&model.category)
        .ok_or_else(|| corrupt("topics.category", &model.category))?;
    let author = model
        .author_key
        .as_deref()
        .map(|key| identity_from_key("topics.author_key", key))
        .transpose()?;

    options.sort_by_key(|option| option.position);

    Ok(Topic {
        id: Snowflake::new(model.id),
        title: model.title,
        body: model.body,
        category,
        options: options.into_iter().map(TopicOption::from).collect(),
        image_urls: model.image_urls,
        thumbnail_url: model.thumbnail_url,
        pinned: model.pinned,
        report_count: model.report_count,
        view_count: model.view_count,
        author,
        created_at: model.created_at,
        deadline: model.deadline,
    })
}

impl From<TopicOptionModel> for TopicOption {
    fn from(model: TopicOptionModel) -> Self {
        TopicOption {
            label: model.label,
            image_url: model.image_url,
            vote_count: model.vote_count,
        }
    }
}

impl TopicActivityModel {
    pub fn into_activity(
        self,
        options: Vec<TopicOptionModel>,
    ) -> Result<TopicWithActivity, DomainError> {
        Ok(TopicWithActivity {
            topic: topic_with_options(self.topic, options)?,
            comment_count: self.comment_count,
        })
    }
}

/// Convert Topic entity reference to values for database insertion
pub struct TopicInsert<'a> {
    pub id: i64,
    pub title: &'a str,
    pub body: &'a str,
    pub category: &'static str,
    pub image_urls: &'a [String],
    pub thumbnail_url: Option<&'a str>,
    pub pinned: bool,
    pub author_key: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub deadline: Option<chrono::DateTime<chrono::Utc>>,
}

impl<'a> TopicInsert<'a> {
    pub fn new(topic: &'a Topic) -> Self {
        Self {
            id: topic.id.into_inner(),
            title: &topic.title,
            body: &topic.body,
            category: topic.category.as_str(),
            image_urls: &topic.image_urls,
            thumbnail_url: topic.thumbnail_url.as_deref(),
            pinned: topic.pinned,
            author_key: topic.author.map(|author| author.key()),
            created_at: topic.created_at,
            deadline: topic.deadline,
        }
    }
}

/// Values for one topic_options row
pub struct TopicOptionInsert<'a> {
    pub position: i32,
    pub label: &'a str,
    pub image_url: Option<&'a str>,
}

impl<'a> TopicOptionInsert<'a> {
    pub fn all(topic: &'a Topic) -> Vec<Self> {
        topic
            .options
            .iter()
            .enumerate()
            .map(|(index, option)| Self {
                position: option_position(index),
                label: &option.label,
                image_url: option.image_url.as_deref(),
            })
            .collect()
    }
}
