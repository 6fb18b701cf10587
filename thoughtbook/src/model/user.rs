use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Entity;
use crate::{
    errors::{ValidationError, ValidationIssue, ValidationResult},
    id::generate_id,
    store::{Collection, Update},
    validators::{check_email, required_trimmed},
};

/// A stored user document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    /// Ids of thoughts authored by this user, oldest first.
    #[serde(default)]
    pub thoughts: Vec<String>,
    /// Ids of users this user has befriended.
    #[serde(default)]
    pub friends: Vec<String>,
}

impl User {
    pub const USERNAME: &'static str = "username";
    pub const EMAIL: &'static str = "email";
    pub const THOUGHTS: &'static str = "thoughts";
    pub const FRIENDS: &'static str = "friends";

    /// Derived on read; never stored.
    pub fn friend_count(&self) -> usize {
        self.friends.len()
    }

    pub fn is_friend(&self, friend_id: &str) -> bool {
        self.friends.iter().any(|id| id == friend_id)
    }
}

impl Entity for User {
    const COLLECTION: Collection = Collection::Users;
    const LABEL: &'static str = "user";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Body of a create-user request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUser {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
}

impl NewUser {
    /// Validates the payload and builds a fresh user with no relations.
    pub fn into_user(self) -> ValidationResult<User> {
        let mut issues = Vec::new();
        let username = required_trimmed(User::USERNAME, &self.username, &mut issues);
        let email = required_trimmed(User::EMAIL, &self.email, &mut issues);
        check_email(User::EMAIL, &email, &mut issues);
        if !issues.is_empty() {
            return Err(ValidationError::new(issues));
        }
        Ok(User {
            id: generate_id(),
            username,
            email,
            created_at: Utc::now(),
            thoughts: Vec::new(),
            friends: Vec::new(),
        })
    }
}

/// Body of an update-user request. Relations are not writable here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
}

impl UserPatch {
    pub fn into_update(self) -> ValidationResult<Update> {
        if self.username.is_none() && self.email.is_none() {
            return Err(ValidationError::new([empty_update()]));
        }
        let mut issues = Vec::new();
        let mut update = Update::new();
        if let Some(username) = self.username {
            let username = required_trimmed(User::USERNAME, &username, &mut issues);
            update = update.set(User::USERNAME, username);
        }
        if let Some(email) = self.email {
            let email = required_trimmed(User::EMAIL, &email, &mut issues);
            check_email(User::EMAIL, &email, &mut issues);
            update = update.set(User::EMAIL, email);
        }
        if !issues.is_empty() {
            return Err(ValidationError::new(issues));
        }
        Ok(update)
    }
}

pub(super) fn empty_update() -> ValidationIssue {
    ValidationIssue::new("body", "validation.empty_update", "no updatable field was provided")
}
