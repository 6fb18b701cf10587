use log::info;

use super::{
    SocialGraph,
    saga::{Saga, Step},
};
use crate::{
    errors::{GraphError, StoreError},
    model::{Entity, NewReaction, NewThought, Reaction, Thought, ThoughtPatch, User},
    store::{DocumentStore, Filter, Update},
};

const INSERT_THOUGHT: Step = Step::new("insert thought", "nothing");
const LINK_AUTHOR: Step = Step::new(
    "append to author's thoughts",
    "thought exists but its author does not reference it",
);
const DELETE_THOUGHT: Step = Step::new("delete thought", "nothing");
const UNLINK_AUTHOR: Step = Step::new(
    "remove from author's thoughts",
    "thought is gone; its author still references the id",
);

impl<S> SocialGraph<S>
where
    S: DocumentStore,
{
    /// Every thought, newest first.
    pub async fn list_thoughts(&self) -> Result<Vec<Thought>, GraphError> {
        Ok(self.thoughts.find_many(self.store(), &Filter::all()).await?)
    }

    pub async fn get_thought(&self, thought_id: &str) -> Result<Thought, GraphError> {
        self.thoughts
            .get(self.store(), thought_id)
            .await?
            .ok_or_else(|| GraphError::not_found(Thought::LABEL, thought_id))
    }

    /// Stores a thought for an existing author and appends it to their list.
    ///
    /// If the append fails the thought stays in place, unreferenced.
    pub async fn create_thought(&self, new_thought: NewThought) -> Result<Thought, GraphError> {
        let thought = new_thought.into_thought()?;

        let author = self
            .users
            .find_one(self.store(), &Filter::all().eq(User::USERNAME, thought.username.as_str()))
            .await?
            .ok_or_else(|| GraphError::not_found(User::LABEL, thought.username.as_str()))?;

        let mut saga = Saga::begin("create_thought");
        let thought = saga
            .run(INSERT_THOUGHT, self.thoughts.insert(self.store(), &thought))
            .await?;

        let link = Update::new().push(User::THOUGHTS, thought.id.as_str());
        saga.run(LINK_AUTHOR, async {
            self.users
                .update_by_id(self.store(), &author.id, &link)
                .await?
                .ok_or_else(|| GraphError::not_found(User::LABEL, author.id.as_str()))
        })
        .await?;

        info!("user {} posted thought {}", author.username, thought.id);
        Ok(thought)
    }

    pub async fn update_thought(&self, thought_id: &str, patch: ThoughtPatch) -> Result<Thought, GraphError> {
        let update = patch.into_update()?;
        self.thoughts
            .update_by_id(self.store(), thought_id, &update)
            .await?
            .ok_or_else(|| GraphError::not_found(Thought::LABEL, thought_id))
    }

    /// Deletes the thought, then removes its id from whichever user lists it.
    ///
    /// An author that no longer exists leaves nothing to unlink.
    pub async fn delete_thought(&self, thought_id: &str) -> Result<Thought, GraphError> {
        let mut saga = Saga::begin("delete_thought");
        let thought = saga
            .run(DELETE_THOUGHT, async {
                self.thoughts
                    .delete_by_id(self.store(), thought_id)
                    .await?
                    .ok_or_else(|| GraphError::not_found(Thought::LABEL, thought_id))
            })
            .await?;

        let referencing = Filter::all().contains(User::THOUGHTS, thought.id.as_str());
        let unlink = Update::new().pull(User::THOUGHTS, thought.id.as_str());
        let unlinked = saga
            .run(UNLINK_AUTHOR, self.users.update_many(self.store(), &referencing, &unlink))
            .await?;
        if unlinked == 0 {
            info!(
                "thought {} deleted; author {} no longer references it",
                thought.id, thought.username
            );
        }

        Ok(thought)
    }

    /// Appends a reaction with a fresh id and returns the updated thought.
    pub async fn add_reaction(&self, thought_id: &str, new_reaction: NewReaction) -> Result<Thought, GraphError> {
        let reaction: Reaction = new_reaction.into_reaction()?;
        let embedded = serde_json::to_value(&reaction).map_err(StoreError::from)?;
        self.thoughts
            .update_by_id(self.store(), thought_id, &Update::new().push(Thought::REACTIONS, embedded))
            .await?
            .ok_or_else(|| GraphError::not_found(Thought::LABEL, thought_id))
    }

    /// Removes the reaction with `reaction_id`. An unknown reaction id leaves
    /// the thought unchanged and still returns it.
    pub async fn delete_reaction(&self, thought_id: &str, reaction_id: &str) -> Result<Thought, GraphError> {
        let update = Update::new().pull_matching(Thought::REACTIONS, Reaction::REACTION_ID, reaction_id);
        self.thoughts
            .update_by_id(self.store(), thought_id, &update)
            .await?
            .ok_or_else(|| GraphError::not_found(Thought::LABEL, thought_id))
    }
}
