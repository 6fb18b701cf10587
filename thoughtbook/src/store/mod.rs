//! Document store adapter.
//!
//! The relationship layer only ever talks to a [`DocumentStore`]: a handful of
//! single-document atomic primitives over two collections plus unique-index
//! enforcement. Nothing here spans documents atomically; `update_many` and
//! `delete_many` are a sequence of independent per-document writes.

mod memory;
pub mod redis;

pub use memory::MemoryStore;
pub use redis::RedisStore;

use std::future::Future;

use serde_json::{Map, Value};

use crate::{errors::StoreError, model::ID_FIELD};

/// The two collections the service persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Thoughts,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Thoughts => "thoughts",
        }
    }

    /// Fields whose values may appear on at most one document of the collection.
    pub fn unique_fields(&self) -> &'static [&'static str] {
        match self {
            Collection::Users => &["username", "email"],
            Collection::Thoughts => &[],
        }
    }
}

/// One condition of a [`Filter`].
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// `field` holds exactly `value`.
    Equals { field: String, value: Value },
    /// `field` is an array with at least one element equal to `value`.
    Contains { field: String, value: Value },
}

/// Conjunction of clauses; an empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<Clause>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: &str) -> Self {
        Self::all().eq(ID_FIELD, id)
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push(Clause::Equals {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn contains(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push(Clause::Contains {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn and(mut self, other: Filter) -> Self {
        self.clauses.extend(other.clauses);
        self
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn matches(&self, document: &Value) -> bool {
        self.clauses.iter().all(|clause| match clause {
            Clause::Equals { field, value } => lookup(document, field) == Some(value),
            Clause::Contains { field, value } => lookup(document, field)
                .and_then(Value::as_array)
                .is_some_and(|items| items.contains(value)),
        })
    }

    /// The id this filter pins, if it has an `id == ...` clause.
    pub fn pinned_id(&self) -> Option<&str> {
        self.equals_str(ID_FIELD)
    }

    /// A unique field of `collection` this filter pins, with its value.
    pub fn pinned_unique(&self, collection: Collection) -> Option<(&'static str, &str)> {
        collection
            .unique_fields()
            .iter()
            .find_map(|field| self.equals_str(field).map(|value| (*field, value)))
    }

    fn equals_str(&self, wanted: &str) -> Option<&str> {
        self.clauses.iter().find_map(|clause| match clause {
            Clause::Equals { field, value } if field == wanted => value.as_str(),
            _ => None,
        })
    }
}

/// One modification applied by an [`Update`].
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOp {
    /// Replace the value at a dotted path, creating intermediate objects.
    Set { path: String, value: Value },
    /// Append to an array field.
    Push { field: String, value: Value },
    /// Append to an array field unless an equal element is already present.
    AddToSet { field: String, value: Value },
    /// Remove every element equal to `value` from an array field.
    Pull { field: String, value: Value },
    /// Remove every object element whose `key` equals `value`.
    PullMatching { field: String, key: String, value: Value },
}

/// Ordered modifications applied to a single document in one atomic step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    ops: Vec<UpdateOp>,
}

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.ops.push(UpdateOp::Set {
            path: path.into(),
            value: value.into(),
        });
        self
    }

    pub fn push(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.ops.push(UpdateOp::Push {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn add_to_set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.ops.push(UpdateOp::AddToSet {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn pull(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.ops.push(UpdateOp::Pull {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn pull_matching(
        mut self,
        field: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.ops.push(UpdateOp::PullMatching {
            field: field.into(),
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn ops(&self) -> &[UpdateOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Applies every operation to `document` in order.
    pub fn apply(&self, document: &mut Value) -> Result<(), StoreError> {
        for op in &self.ops {
            match op {
                UpdateOp::Set { path, value } => {
                    let segments = path_segments(path);
                    if segments.first() == Some(&ID_FIELD) && segments.len() == 1 {
                        return Err(StoreError::InvalidUpdate {
                            path: path.clone(),
                            message: "identifier is immutable".into(),
                        });
                    }
                    set_value_at_path(document, &segments, value.clone())?;
                }
                UpdateOp::Push { field, value } => array_mut(document, field)?.push(value.clone()),
                UpdateOp::AddToSet { field, value } => {
                    let items = array_mut(document, field)?;
                    if !items.contains(value) {
                        items.push(value.clone());
                    }
                }
                UpdateOp::Pull { field, value } => array_mut(document, field)?.retain(|item| item != value),
                UpdateOp::PullMatching { field, key, value } => {
                    array_mut(document, field)?.retain(|item| item.get(key) != Some(value))
                }
            }
        }
        Ok(())
    }
}

/// Persistence primitives the relationship layer is built on.
///
/// Every call is atomic for the single document it touches. Implementations
/// enforce [`Collection::unique_fields`] on insert and on update, rejecting the
/// write with [`StoreError::UniqueViolation`] and leaving nothing behind.
pub trait DocumentStore: Send + Sync + 'static {
    /// Inserts a document carrying its own `id`; returns the stored document.
    fn insert_one(
        &self,
        collection: Collection,
        document: Value,
    ) -> impl Future<Output = Result<Value, StoreError>> + Send;

    /// Newest matching document.
    fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> impl Future<Output = Result<Option<Value>, StoreError>> + Send;

    /// Every matching document, newest first.
    fn find_many(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> impl Future<Output = Result<Vec<Value>, StoreError>> + Send;

    /// Applies `update` to the newest matching document and returns it as updated.
    fn find_one_and_update(
        &self,
        collection: Collection,
        filter: &Filter,
        update: &Update,
    ) -> impl Future<Output = Result<Option<Value>, StoreError>> + Send;

    /// Removes the newest matching document and returns it.
    fn find_one_and_delete(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> impl Future<Output = Result<Option<Value>, StoreError>> + Send;

    /// Applies `update` to every matching document; returns how many were modified.
    fn update_many(
        &self,
        collection: Collection,
        filter: &Filter,
        update: &Update,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Removes every matching document; returns how many were removed.
    fn delete_many(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Verifies the backend is reachable.
    fn ping(&self) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Reads the identifier every stored document must carry.
pub(crate) fn document_id(document: &Value) -> Result<&str, StoreError> {
    document
        .get(ID_FIELD)
        .and_then(Value::as_str)
        .ok_or_else(|| StoreError::Serialization {
            message: "document has no string `id` field".into(),
        })
}

/// String value of a unique field, if the document has one.
pub(crate) fn unique_value<'a>(document: &'a Value, field: &str) -> Option<&'a str> {
    document.get(field).and_then(Value::as_str)
}

fn lookup<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path_segments(path)
        .into_iter()
        .try_fold(document, |current, segment| current.get(segment))
}

fn path_segments(path: &str) -> Vec<&str> {
    path.split('.').filter(|segment| !segment.is_empty()).collect()
}

fn set_value_at_path(target: &mut Value, segments: &[&str], value: Value) -> Result<(), StoreError> {
    let Some((key, parents)) = segments.split_last() else {
        return Err(StoreError::InvalidUpdate {
            path: String::new(),
            message: "path cannot be empty".into(),
        });
    };
    let parent = parent_map_mut(target, parents)?;
    parent.insert((*key).to_string(), value);
    Ok(())
}

fn parent_map_mut<'a>(value: &'a mut Value, segments: &[&str]) -> Result<&'a mut Map<String, Value>, StoreError> {
    let mut current = value;
    for segment in segments {
        match current {
            Value::Object(map) => {
                current = map.entry((*segment).to_string()).or_insert_with(|| Value::Object(Map::new()));
            }
            _ => {
                return Err(StoreError::InvalidUpdate {
                    path: (*segment).to_string(),
                    message: "expected object while traversing update path".into(),
                });
            }
        }
    }
    match current {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::InvalidUpdate {
            path: segments.join("."),
            message: "expected object while applying update".into(),
        }),
    }
}

fn array_mut<'a>(document: &'a mut Value, field: &str) -> Result<&'a mut Vec<Value>, StoreError> {
    let map = document.as_object_mut().ok_or_else(|| StoreError::InvalidUpdate {
        path: field.to_string(),
        message: "document is not an object".into(),
    })?;
    let slot = map.entry(field.to_string()).or_insert_with(|| Value::Array(Vec::new()));
    match slot {
        Value::Array(items) => Ok(items),
        _ => Err(StoreError::InvalidUpdate {
            path: field.to_string(),
            message: "expected array".into(),
        }),
    }
}
