use log::info;

use super::{
    SocialGraph,
    populate::{populate_user, populate_users},
    saga::{Saga, Step},
};
use crate::{
    errors::{GraphError, ValidationError},
    model::{Entity, NewUser, Thought, User, UserPatch, view::PopulatedUser},
    store::{DocumentStore, Filter, Update},
};

const DELETE_USER: Step = Step::new("delete user", "nothing");
const CASCADE_THOUGHTS: Step = Step::new(
    "delete authored thoughts",
    "user is gone; some or all of their thoughts remain",
);
const UNLINK_FRIENDS: Step = Step::new(
    "remove from friend lists",
    "user and their thoughts are gone; some friend lists still reference the user",
);

/// Outcome of [`SocialGraph::delete_user`].
#[derive(Debug, Clone, PartialEq)]
pub struct DeletedUser {
    pub user: User,
    pub thoughts_deleted: u64,
    pub friend_links_removed: u64,
}

impl<S> SocialGraph<S>
where
    S: DocumentStore,
{
    /// Every user, newest first, with references resolved.
    pub async fn list_users(&self) -> Result<Vec<PopulatedUser>, GraphError> {
        let users = self.users.find_many(self.store(), &Filter::all()).await?;
        Ok(populate_users(self.store(), users).await?)
    }

    pub async fn get_user(&self, user_id: &str) -> Result<PopulatedUser, GraphError> {
        let user = self.require_user(user_id).await?;
        Ok(populate_user(self.store(), user).await?)
    }

    /// Validates and stores a new user. Duplicate usernames or emails are
    /// rejected by the store's unique index and surface as validation errors.
    pub async fn create_user(&self, new_user: NewUser) -> Result<PopulatedUser, GraphError> {
        let user = new_user.into_user()?;
        let user = self.users.insert(self.store(), &user).await?;
        info!("created user {} ({})", user.id, user.username);
        Ok(populate_user(self.store(), user).await?)
    }

    pub async fn update_user(&self, user_id: &str, patch: UserPatch) -> Result<PopulatedUser, GraphError> {
        let update = patch.into_update()?;
        let user = self
            .users
            .update_by_id(self.store(), user_id, &update)
            .await?
            .ok_or_else(|| GraphError::not_found(User::LABEL, user_id))?;
        Ok(populate_user(self.store(), user).await?)
    }

    /// Deletes the user, then every thought carrying their username, then
    /// every reference to them in other users' friend lists.
    pub async fn delete_user(&self, user_id: &str) -> Result<DeletedUser, GraphError> {
        let mut saga = Saga::begin("delete_user");
        let user = saga
            .run(DELETE_USER, async {
                self.users
                    .delete_by_id(self.store(), user_id)
                    .await?
                    .ok_or_else(|| GraphError::not_found(User::LABEL, user_id))
            })
            .await?;

        let authored = Filter::all().eq(Thought::USERNAME, user.username.as_str());
        let thoughts_deleted = saga
            .run(CASCADE_THOUGHTS, self.thoughts.delete_many(self.store(), &authored))
            .await?;

        let referencing = Filter::all().contains(User::FRIENDS, user.id.as_str());
        let unlink = Update::new().pull(User::FRIENDS, user.id.as_str());
        let friend_links_removed = saga
            .run(UNLINK_FRIENDS, self.users.update_many(self.store(), &referencing, &unlink))
            .await?;

        info!(
            "deleted user {} with {thoughts_deleted} thought(s); removed from {friend_links_removed} friend list(s)",
            user.id
        );
        Ok(DeletedUser {
            user,
            thoughts_deleted,
            friend_links_removed,
        })
    }

    /// Adds `friend_id` to `user_id`'s friends. Only this direction is written.
    pub async fn add_friend(&self, user_id: &str, friend_id: &str) -> Result<PopulatedUser, GraphError> {
        if user_id == friend_id {
            let issue = ValidationError::single("friendId", "validation.self_friend", "a user cannot befriend themselves");
            return Err(issue.into());
        }

        if !self.users.exists(self.store(), friend_id).await? {
            return Err(GraphError::not_found(User::LABEL, friend_id));
        }

        let already = Filter::by_id(user_id).contains(User::FRIENDS, friend_id);
        if self.users.find_one(self.store(), &already).await?.is_some() {
            return Err(GraphError::conflict(format!(
                "user {user_id} is already friends with {friend_id}"
            )));
        }

        // A concurrent add can slip past the check above; add-to-set keeps the list a set anyway.
        let user = self
            .users
            .update_by_id(self.store(), user_id, &Update::new().add_to_set(User::FRIENDS, friend_id))
            .await?
            .ok_or_else(|| GraphError::not_found(User::LABEL, user_id))?;
        Ok(populate_user(self.store(), user).await?)
    }

    /// Removes `friend_id` from `user_id`'s friends. Removing a non-friend is a no-op.
    pub async fn delete_friend(&self, user_id: &str, friend_id: &str) -> Result<PopulatedUser, GraphError> {
        let user = self
            .users
            .update_by_id(self.store(), user_id, &Update::new().pull(User::FRIENDS, friend_id))
            .await?
            .ok_or_else(|| GraphError::not_found(User::LABEL, user_id))?;
        Ok(populate_user(self.store(), user).await?)
    }

    pub(super) async fn require_user(&self, user_id: &str) -> Result<User, GraphError> {
        self.users
            .get(self.store(), user_id)
            .await?
            .ok_or_else(|| GraphError::not_found(User::LABEL, user_id))
    }
}
