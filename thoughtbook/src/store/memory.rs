use std::{
    collections::HashMap,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use serde_json::Value;

use super::{Collection, DocumentStore, Filter, Update, document_id, unique_value};
use crate::errors::StoreError;

/// Process-local store used for development and tests.
///
/// Each collection is kept in insertion order; every call holds the lock for
/// its whole duration, which gives the same per-document atomicity the Redis
/// adapter provides.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in `collection`.
    pub fn len(&self, collection: Collection) -> Result<usize, StoreError> {
        Ok(self.read()?.get(&collection).map_or(0, Vec::len))
    }

    pub fn is_empty(&self, collection: Collection) -> Result<bool, StoreError> {
        Ok(self.len(collection)? == 0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<Collection, Vec<Value>>>, StoreError> {
        self.collections.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<Collection, Vec<Value>>>, StoreError> {
        self.collections.write().map_err(|_| StoreError::Poisoned)
    }
}

/// Rejects `candidate` if another document already owns one of its unique values.
fn check_unique(collection: Collection, documents: &[Value], candidate: &Value) -> Result<(), StoreError> {
    let candidate_id = document_id(candidate)?;
    for field in collection.unique_fields() {
        let Some(value) = unique_value(candidate, field) else {
            continue;
        };
        let owner = documents.iter().find(|existing| {
            unique_value(existing, field) == Some(value) && document_id(existing).ok() != Some(candidate_id)
        });
        if let Some(owner) = owner {
            return Err(StoreError::UniqueViolation {
                collection: collection.name().to_string(),
                field: (*field).to_string(),
                value: value.to_string(),
                existing_id: document_id(owner)?.to_string(),
            });
        }
    }
    Ok(())
}

/// Index of the newest document matching `filter`.
fn newest_match(documents: &[Value], filter: &Filter) -> Option<usize> {
    documents.iter().rposition(|document| filter.matches(document))
}

impl DocumentStore for MemoryStore {
    async fn insert_one(&self, collection: Collection, document: Value) -> Result<Value, StoreError> {
        let mut collections = self.write()?;
        let documents = collections.entry(collection).or_default();
        let id = document_id(&document)?;
        if documents.iter().any(|existing| document_id(existing).ok() == Some(id)) {
            return Err(StoreError::UniqueViolation {
                collection: collection.name().to_string(),
                field: "id".to_string(),
                value: id.to_string(),
                existing_id: id.to_string(),
            });
        }
        check_unique(collection, documents, &document)?;
        documents.push(document.clone());
        Ok(document)
    }

    async fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Option<Value>, StoreError> {
        let collections = self.read()?;
        Ok(collections
            .get(&collection)
            .and_then(|documents| newest_match(documents, filter).map(|index| documents[index].clone())))
    }

    async fn find_many(&self, collection: Collection, filter: &Filter) -> Result<Vec<Value>, StoreError> {
        let collections = self.read()?;
        Ok(collections
            .get(&collection)
            .map(|documents| {
                documents
                    .iter()
                    .rev()
                    .filter(|document| filter.matches(document))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_one_and_update(
        &self,
        collection: Collection,
        filter: &Filter,
        update: &Update,
    ) -> Result<Option<Value>, StoreError> {
        let mut collections = self.write()?;
        let Some(documents) = collections.get_mut(&collection) else {
            return Ok(None);
        };
        let Some(index) = newest_match(documents, filter) else {
            return Ok(None);
        };
        let mut next = documents[index].clone();
        update.apply(&mut next)?;
        check_unique(collection, documents, &next)?;
        documents[index] = next.clone();
        Ok(Some(next))
    }

    async fn find_one_and_delete(&self, collection: Collection, filter: &Filter) -> Result<Option<Value>, StoreError> {
        let mut collections = self.write()?;
        let Some(documents) = collections.get_mut(&collection) else {
            return Ok(None);
        };
        Ok(newest_match(documents, filter).map(|index| documents.remove(index)))
    }

    async fn update_many(&self, collection: Collection, filter: &Filter, update: &Update) -> Result<u64, StoreError> {
        let mut collections = self.write()?;
        let Some(documents) = collections.get_mut(&collection) else {
            return Ok(0);
        };
        let mut modified = 0;
        for index in 0..documents.len() {
            if !filter.matches(&documents[index]) {
                continue;
            }
            let mut next = documents[index].clone();
            update.apply(&mut next)?;
            check_unique(collection, documents, &next)?;
            if next != documents[index] {
                documents[index] = next;
                modified += 1;
            }
        }
        Ok(modified)
    }

    async fn delete_many(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError> {
        let mut collections = self.write()?;
        let Some(documents) = collections.get_mut(&collection) else {
            return Ok(0);
        };
        let before = documents.len();
        documents.retain(|document| !filter.matches(document));
        Ok((before - documents.len()) as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.read().map(|_| ())
    }
}
