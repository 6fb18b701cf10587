use std::marker::PhantomData;

use serde_json::Value;

use crate::{
    errors::StoreError,
    model::Entity,
    store::{DocumentStore, Filter, Update},
};

/// Typed access to the collection of `T` over any [`DocumentStore`].
///
/// Holds no connection; every call borrows the store it should run against.
pub struct Repo<T>
where
    T: Entity,
{
    _marker: PhantomData<T>,
}

impl<T> Default for Repo<T>
where
    T: Entity,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Repo<T>
where
    T: Entity,
{
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> Copy for Repo<T> where T: Entity {}

impl<T> std::fmt::Debug for Repo<T>
where
    T: Entity,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repo").field("collection", &T::COLLECTION.name()).finish()
    }
}

impl<T> Repo<T>
where
    T: Entity,
{
    pub const fn new() -> Self {
        Self { _marker: PhantomData }
    }

    pub async fn get<S: DocumentStore>(&self, store: &S, entity_id: &str) -> Result<Option<T>, StoreError> {
        self.find_one(store, &Filter::by_id(entity_id)).await
    }

    pub async fn exists<S: DocumentStore>(&self, store: &S, entity_id: &str) -> Result<bool, StoreError> {
        Ok(store.find_one(T::COLLECTION, &Filter::by_id(entity_id)).await?.is_some())
    }

    pub async fn find_one<S: DocumentStore>(&self, store: &S, filter: &Filter) -> Result<Option<T>, StoreError> {
        store.find_one(T::COLLECTION, filter).await?.map(decode).transpose()
    }

    /// Every matching entity, newest first.
    pub async fn find_many<S: DocumentStore>(&self, store: &S, filter: &Filter) -> Result<Vec<T>, StoreError> {
        store
            .find_many(T::COLLECTION, filter)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    pub async fn insert<S: DocumentStore>(&self, store: &S, entity: &T) -> Result<T, StoreError> {
        let document = serde_json::to_value(entity)?;
        decode(store.insert_one(T::COLLECTION, document).await?)
    }

    /// Applies `update` to the newest match and returns it as stored afterwards.
    pub async fn update<S: DocumentStore>(
        &self,
        store: &S,
        filter: &Filter,
        update: &Update,
    ) -> Result<Option<T>, StoreError> {
        store
            .find_one_and_update(T::COLLECTION, filter, update)
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn update_by_id<S: DocumentStore>(
        &self,
        store: &S,
        entity_id: &str,
        update: &Update,
    ) -> Result<Option<T>, StoreError> {
        self.update(store, &Filter::by_id(entity_id), update).await
    }

    /// Removes the newest match and returns what was removed.
    pub async fn delete<S: DocumentStore>(&self, store: &S, filter: &Filter) -> Result<Option<T>, StoreError> {
        store.find_one_and_delete(T::COLLECTION, filter).await?.map(decode).transpose()
    }

    pub async fn delete_by_id<S: DocumentStore>(&self, store: &S, entity_id: &str) -> Result<Option<T>, StoreError> {
        self.delete(store, &Filter::by_id(entity_id)).await
    }

    pub async fn update_many<S: DocumentStore>(
        &self,
        store: &S,
        filter: &Filter,
        update: &Update,
    ) -> Result<u64, StoreError> {
        store.update_many(T::COLLECTION, filter, update).await
    }

    pub async fn delete_many<S: DocumentStore>(&self, store: &S, filter: &Filter) -> Result<u64, StoreError> {
        store.delete_many(T::COLLECTION, filter).await
    }
}

fn decode<T: Entity>(document: Value) -> Result<T, StoreError> {
    serde_json::from_value(document).map_err(|err| StoreError::Serialization {
        message: format!("failed to deserialize {}: {err}", T::LABEL).into(),
    })
}
