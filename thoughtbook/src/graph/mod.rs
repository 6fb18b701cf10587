//! Relationship integrity layer.
//!
//! Every mutating operation is a short sequence of single-document store
//! calls. The first failure is returned and nothing after it runs; earlier
//! writes stay in place (see [`saga`]). Reads resolve references through
//! [`populate`] and drop the ones that no longer exist.
//!
//! Friendship is directed: `add_friend(u, f)` records `f` in `u.friends` only.

pub mod populate;
pub mod saga;
mod thoughts;
mod users;

pub use users::DeletedUser;

use std::sync::Arc;

use crate::{
    model::{Thought, User},
    repository::Repo,
    store::DocumentStore,
};

/// Entry point for every user, friend, thought and reaction operation.
pub struct SocialGraph<S> {
    store: Arc<S>,
    users: Repo<User>,
    thoughts: Repo<Thought>,
}

impl<S> Clone for SocialGraph<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            users: self.users,
            thoughts: self.thoughts,
        }
    }
}

impl<S> SocialGraph<S>
where
    S: DocumentStore,
{
    pub fn new(store: S) -> Self {
        Self::from_shared(Arc::new(store))
    }

    pub fn from_shared(store: Arc<S>) -> Self {
        Self {
            store,
            users: Repo::new(),
            thoughts: Repo::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
