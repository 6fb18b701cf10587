use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, user::empty_update};
use crate::{
    errors::{ValidationError, ValidationResult},
    id::generate_id,
    store::{Collection, Update},
    validators::{REACTION_BODY_MAX, THOUGHT_TEXT_MAX, check_length, required_trimmed},
};

/// A stored thought document with its embedded reactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thought {
    pub id: String,
    pub thought_text: String,
    /// Author's username as it was when the thought was created.
    pub username: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
}

impl Thought {
    pub const THOUGHT_TEXT: &'static str = "thoughtText";
    pub const USERNAME: &'static str = "username";
    pub const REACTIONS: &'static str = "reactions";

    pub fn reaction_count(&self) -> usize {
        self.reactions.len()
    }
}

impl Entity for Thought {
    const COLLECTION: Collection = Collection::Thoughts;
    const LABEL: &'static str = "thought";

    fn id(&self) -> &str {
        &self.id
    }
}

/// A reaction embedded in its parent thought.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub reaction_id: String,
    pub reaction_body: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl Reaction {
    pub const REACTION_ID: &'static str = "reactionId";
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewThought {
    #[serde(default)]
    pub thought_text: String,
    #[serde(default)]
    pub username: String,
}

impl NewThought {
    pub fn into_thought(self) -> ValidationResult<Thought> {
        let mut issues = Vec::new();
        check_length(Thought::THOUGHT_TEXT, &self.thought_text, 1, THOUGHT_TEXT_MAX, &mut issues);
        let username = required_trimmed(Thought::USERNAME, &self.username, &mut issues);
        if !issues.is_empty() {
            return Err(ValidationError::new(issues));
        }
        Ok(Thought {
            id: generate_id(),
            thought_text: self.thought_text,
            username,
            created_at: Utc::now(),
            reactions: Vec::new(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThoughtPatch {
    pub thought_text: Option<String>,
}

impl ThoughtPatch {
    pub fn into_update(self) -> ValidationResult<Update> {
        let Some(thought_text) = self.thought_text else {
            return Err(ValidationError::new([empty_update()]));
        };
        let mut issues = Vec::new();
        check_length(Thought::THOUGHT_TEXT, &thought_text, 1, THOUGHT_TEXT_MAX, &mut issues);
        if !issues.is_empty() {
            return Err(ValidationError::new(issues));
        }
        Ok(Update::new().set(Thought::THOUGHT_TEXT, thought_text))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReaction {
    #[serde(default)]
    pub reaction_body: String,
    #[serde(default)]
    pub username: String,
}

impl NewReaction {
    pub fn into_reaction(self) -> ValidationResult<Reaction> {
        let mut issues = Vec::new();
        check_length("reactionBody", &self.reaction_body, 1, REACTION_BODY_MAX, &mut issues);
        let username = required_trimmed("username", &self.username, &mut issues);
        if !issues.is_empty() {
            return Err(ValidationError::new(issues));
        }
        Ok(Reaction {
            reaction_id: generate_id(),
            reaction_body: self.reaction_body,
            username,
            created_at: Utc::now(),
        })
    }
}
