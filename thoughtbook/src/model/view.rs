//! Output representations. Timestamps are rendered with [`format_timestamp`]
//! and derived counts are computed here, never stored.

use serde::Serialize;

use super::{Reaction, Thought, User, format_timestamp};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionView {
    pub reaction_id: String,
    pub reaction_body: String,
    pub username: String,
    pub created_at: String,
}

impl From<&Reaction> for ReactionView {
    fn from(reaction: &Reaction) -> Self {
        Self {
            reaction_id: reaction.reaction_id.clone(),
            reaction_body: reaction.reaction_body.clone(),
            username: reaction.username.clone(),
            created_at: format_timestamp(&reaction.created_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThoughtView {
    pub id: String,
    pub thought_text: String,
    pub username: String,
    pub created_at: String,
    pub reactions: Vec<ReactionView>,
    pub reaction_count: usize,
}

impl From<&Thought> for ThoughtView {
    fn from(thought: &Thought) -> Self {
        Self {
            id: thought.id.clone(),
            thought_text: thought.thought_text.clone(),
            username: thought.username.clone(),
            created_at: format_timestamp(&thought.created_at),
            reactions: thought.reactions.iter().map(ReactionView::from).collect(),
            reaction_count: thought.reaction_count(),
        }
    }
}

/// A user as it appears inside another user's `friends`: references stay ids,
/// limited to the ones that still resolve.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: String,
    pub thoughts: Vec<String>,
    pub friends: Vec<String>,
    pub friend_count: usize,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: format_timestamp(&user.created_at),
            thoughts: user.thoughts.clone(),
            friends: user.friends.clone(),
            friend_count: user.friend_count(),
        }
    }
}

/// A user with its references resolved into the documents they point at.
///
/// Ids that no longer resolve are absent, so `friendCount` counts only the
/// friends that still exist.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: String,
    pub thoughts: Vec<ThoughtView>,
    pub friends: Vec<UserSummary>,
    pub friend_count: usize,
}

/// A user and the referenced documents that still exist, in reference order.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulatedUser {
    pub user: User,
    pub thoughts: Vec<Thought>,
    pub friends: Vec<User>,
}

impl From<&PopulatedUser> for UserView {
    fn from(populated: &PopulatedUser) -> Self {
        let user = &populated.user;
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: format_timestamp(&user.created_at),
            thoughts: populated.thoughts.iter().map(ThoughtView::from).collect(),
            friends: populated.friends.iter().map(UserSummary::from).collect(),
            friend_count: populated.friends.len(),
        }
    }
}
