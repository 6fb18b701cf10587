use std::sync::Mutex;

pub(crate) use serde_json::Value;
pub(crate) use thoughtbook::{
    Collection, DocumentStore, Filter, GraphError, MemoryStore, Repo, SocialGraph, StoreError, Update,
    model::{NewReaction, NewThought, NewUser, Thought, ThoughtPatch, User, UserPatch},
};

pub(crate) fn memory_graph() -> SocialGraph<MemoryStore> {
    SocialGraph::new(MemoryStore::new())
}

pub(crate) fn new_user(username: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
    }
}

pub(crate) fn new_thought(username: &str, text: &str) -> NewThought {
    NewThought {
        thought_text: text.to_string(),
        username: username.to_string(),
    }
}

pub(crate) fn new_reaction(username: &str, body: &str) -> NewReaction {
    NewReaction {
        reaction_body: body.to_string(),
        username: username.to_string(),
    }
}

pub(crate) async fn create_user<S: DocumentStore>(graph: &SocialGraph<S>, username: &str) -> User {
    graph.create_user(new_user(username)).await.expect("create user").user
}

pub(crate) async fn post<S: DocumentStore>(graph: &SocialGraph<S>, username: &str, text: &str) -> Thought {
    graph.create_thought(new_thought(username, text)).await.expect("create thought")
}

/// Raw stored user, bypassing population.
pub(crate) async fn stored_user<S: DocumentStore>(graph: &SocialGraph<S>, user_id: &str) -> Option<User> {
    Repo::<User>::new().get(graph.store(), user_id).await.expect("read user")
}

pub(crate) async fn all_thoughts<S: DocumentStore>(graph: &SocialGraph<S>) -> Vec<Thought> {
    Repo::<Thought>::new()
        .find_many(graph.store(), &Filter::all())
        .await
        .expect("read thoughts")
}

/// Store call kinds a [`FailingStore`] can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    Insert,
    FindOneAndUpdate,
    FindOneAndDelete,
    UpdateMany,
    DeleteMany,
}

/// Memory store that fails selected calls once, to exercise interrupted writes.
#[derive(Default)]
pub(crate) struct FailingStore {
    inner: MemoryStore,
    armed: Mutex<Vec<(Op, Collection)>>,
}

impl FailingStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The next `op` against `collection` fails without touching the data.
    pub(crate) fn fail_next(&self, op: Op, collection: Collection) {
        self.armed.lock().unwrap().push((op, collection));
    }

    fn trip(&self, op: Op, collection: Collection) -> Result<(), StoreError> {
        let mut armed = self.armed.lock().unwrap();
        match armed.iter().position(|entry| *entry == (op, collection)) {
            Some(index) => {
                armed.remove(index);
                Err(StoreError::Script {
                    code: format!("injected {op:?} failure on {}", collection.name()),
                })
            }
            None => Ok(()),
        }
    }
}

impl DocumentStore for FailingStore {
    async fn insert_one(&self, collection: Collection, document: Value) -> Result<Value, StoreError> {
        self.trip(Op::Insert, collection)?;
        self.inner.insert_one(collection, document).await
    }

    async fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Option<Value>, StoreError> {
        self.inner.find_one(collection, filter).await
    }

    async fn find_many(&self, collection: Collection, filter: &Filter) -> Result<Vec<Value>, StoreError> {
        self.inner.find_many(collection, filter).await
    }

    async fn find_one_and_update(
        &self,
        collection: Collection,
        filter: &Filter,
        update: &Update,
    ) -> Result<Option<Value>, StoreError> {
        self.trip(Op::FindOneAndUpdate, collection)?;
        self.inner.find_one_and_update(collection, filter, update).await
    }

    async fn find_one_and_delete(&self, collection: Collection, filter: &Filter) -> Result<Option<Value>, StoreError> {
        self.trip(Op::FindOneAndDelete, collection)?;
        self.inner.find_one_and_delete(collection, filter).await
    }

    async fn update_many(&self, collection: Collection, filter: &Filter, update: &Update) -> Result<u64, StoreError> {
        self.trip(Op::UpdateMany, collection)?;
        self.inner.update_many(collection, filter, update).await
    }

    async fn delete_many(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError> {
        self.trip(Op::DeleteMany, collection)?;
        self.inner.delete_many(collection, filter).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.inner.ping().await
    }
}
