//! Author directory - how comment authors are shown within one topic
//!
//! Members appear under their nickname. Anonymous authors appear under the
//! topic's `AnonymousN` label, which is stored together with their first
//! comment. Comments that predate the label table get one here, in
//! first-comment order.

use std::collections::{HashMap, HashSet};
use std::fmt::Display;

use politalk_core::entities::{AnonymousAlias, Comment, Topic, User, ANONYMOUS_LABEL_PREFIX};
use politalk_core::{AliasAllocator, Identity, Snowflake};

use tracing::warn;

use crate::dto::AuthorResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Shown for members whose account no longer exists
const UNKNOWN_MEMBER: &str = "(unknown)";

pub struct AuthorDirectory {
    topic_author: Option<Identity>,
    members: HashMap<Snowflake, User>,
    aliases: AliasAllocator,
}

impl AuthorDirectory {
    pub fn new(
        topic_author: Option<Identity>,
        members: impl IntoIterator<Item = User>,
        aliases: AliasAllocator,
    ) -> Self {
        Self {
            topic_author,
            members: members.into_iter().map(|user| (user.id, user)).collect(),
            aliases,
        }
    }

    /// Load names for every author in `comments`
    pub async fn load(
        ctx: &ServiceContext,
        topic: &Topic,
        comments: &[Comment],
    ) -> ServiceResult<Self> {
        let member_ids: Vec<Snowflake> = comments
            .iter()
            .filter_map(|c| c.author.member_id())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let members = if member_ids.is_empty() {
            Vec::new()
        } else {
            ctx.user_repo().find_by_ids(&member_ids).await?
        };

        let existing = ctx.alias_repo().find_by_topic(topic.id).await?;
        let mut aliases = AliasAllocator::with_existing(topic.id, existing);
        for anonymous_id in aliases.unassigned_in_order(comments) {
            match ctx.alias_repo().assign(topic.id, anonymous_id).await {
                Ok(alias) => aliases.insert(alias),
                Err(e) => {
                    // shown as plain "Anonymous" until the next render
                    warn!(error = %e, topic_id = %topic.id, "Alias backfill failed");
                    break;
                }
            }
        }

        Ok(Self::new(topic.author, members, aliases))
    }

    /// Names for a comment that is already stored. Never fails: a failed
    /// member lookup shows the unknown-member label.
    pub fn for_posted<E: Display>(
        topic: &Topic,
        member_lookup: Result<Option<User>, E>,
        alias: Option<AnonymousAlias>,
    ) -> Self {
        let member = member_lookup.unwrap_or_else(|e| {
            warn!(error = %e, topic_id = %topic.id, "Author lookup failed");
            None
        });
        Self::new(
            topic.author,
            member,
            AliasAllocator::with_existing(topic.id, alias),
        )
    }

    pub fn author(&self, identity: &Identity) -> AuthorResponse {
        let is_topic_author = self.topic_author.as_ref() == Some(identity);
        match identity {
            Identity::Member(user_id) => {
                let user = self.members.get(user_id);
                AuthorResponse {
                    name: user.map_or_else(|| UNKNOWN_MEMBER.to_string(), |u| u.nickname.clone()),
                    anonymous: false,
                    user_id: Some(user_id.to_string()),
                    avatar_url: user.and_then(|u| u.avatar_url.clone()),
                    is_topic_author,
                }
            }
            Identity::Anonymous(anonymous_id) => AuthorResponse {
                name: self
                    .aliases
                    .label(anonymous_id)
                    .unwrap_or_else(|| ANONYMOUS_LABEL_PREFIX.to_string()),
                anonymous: true,
                user_id: None,
                avatar_url: None,
                is_topic_author,
            },
        }
    }
}
