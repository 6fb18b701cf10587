//! Resolves user references into documents for output.
//!
//! A reference that no longer resolves is dropped rather than reported, which
//! is how reads tolerate the residue of interrupted multi-step writes.

use std::collections::HashMap;

use log::debug;

use crate::{
    errors::StoreError,
    model::{Thought, User, view::PopulatedUser},
    repository::Repo,
    store::DocumentStore,
};

/// Lookup cache shared across the users of one read.
#[derive(Debug, Default)]
pub struct Resolver {
    thoughts: HashMap<String, Option<Thought>>,
    users: HashMap<String, Option<User>>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn populate<S: DocumentStore>(&mut self, store: &S, user: User) -> Result<PopulatedUser, StoreError> {
        let mut thoughts = Vec::with_capacity(user.thoughts.len());
        for id in &user.thoughts {
            match self.thought(store, id).await? {
                Some(thought) => thoughts.push(thought),
                None => debug!("user {} references missing thought {id}; dropped", user.id),
            }
        }

        let mut friends = Vec::with_capacity(user.friends.len());
        for id in &user.friends {
            match self.user(store, id).await? {
                Some(mut friend) => {
                    // Friends render their own references as ids; keep only live ones.
                    friend.thoughts = self.live_thought_ids(store, &friend.thoughts).await?;
                    friend.friends = self.live_user_ids(store, &friend.friends).await?;
                    friends.push(friend);
                }
                None => debug!("user {} references missing friend {id}; dropped", user.id),
            }
        }

        Ok(PopulatedUser {
            user,
            thoughts,
            friends,
        })
    }

    async fn live_thought_ids<S: DocumentStore>(&mut self, store: &S, ids: &[String]) -> Result<Vec<String>, StoreError> {
        let mut live = Vec::with_capacity(ids.len());
        for id in ids {
            if self.thought(store, id).await?.is_some() {
                live.push(id.clone());
            }
        }
        Ok(live)
    }

    async fn live_user_ids<S: DocumentStore>(&mut self, store: &S, ids: &[String]) -> Result<Vec<String>, StoreError> {
        let mut live = Vec::with_capacity(ids.len());
        for id in ids {
            if self.user(store, id).await?.is_some() {
                live.push(id.clone());
            }
        }
        Ok(live)
    }

    async fn thought<S: DocumentStore>(&mut self, store: &S, id: &str) -> Result<Option<Thought>, StoreError> {
        if let Some(cached) = self.thoughts.get(id) {
            return Ok(cached.clone());
        }
        let found = Repo::<Thought>::new().get(store, id).await?;
        self.thoughts.insert(id.to_string(), found.clone());
        Ok(found)
    }

    async fn user<S: DocumentStore>(&mut self, store: &S, id: &str) -> Result<Option<User>, StoreError> {
        if let Some(cached) = self.users.get(id) {
            return Ok(cached.clone());
        }
        let found = Repo::<User>::new().get(store, id).await?;
        self.users.insert(id.to_string(), found.clone());
        Ok(found)
    }
}

pub async fn populate_user<S: DocumentStore>(store: &S, user: User) -> Result<PopulatedUser, StoreError> {
    Resolver::new().populate(store, user).await
}

pub async fn populate_users<S: DocumentStore>(store: &S, users: Vec<User>) -> Result<Vec<PopulatedUser>, StoreError> {
    let mut resolver = Resolver::new();
    let mut populated = Vec::with_capacity(users.len());
    for user in users {
        populated.push(resolver.populate(store, user).await?);
    }
    Ok(populated)
}
