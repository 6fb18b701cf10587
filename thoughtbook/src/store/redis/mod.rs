//! Redis-backed [`DocumentStore`].
//!
//! Layout under the configured prefix:
//!
//! - `{prefix}:{collection}:doc:{id}` holds the document JSON.
//! - `{prefix}:{collection}:index` is a sorted set of ids scored by insertion sequence.
//! - `{prefix}:{collection}:unique:{field}:{value}` holds the id owning a unique value.
//!
//! Every write runs as a Lua script so that unique claims and the document
//! change land together. Updates are computed here and swapped in only if the
//! stored JSON is still the one that was read.

pub mod commands;
pub mod executor;
pub mod scripts;

use log::debug;
use redis::{AsyncCommands, aio::ConnectionManager, cmd};
use serde_json::Value;

use self::{
    commands::{DeleteCommand, InsertCommand, ReplaceCommand, UniqueClaim},
    executor::{ScriptOutcome, run_script},
    scripts::{DOCUMENT_DELETE_SCRIPT, DOCUMENT_INSERT_SCRIPT, DOCUMENT_REPLACE_SCRIPT},
};
use super::{Collection, DocumentStore, Filter, Update, document_id, unique_value};
use crate::{errors::StoreError, keys::KeyContext};

/// Compare-and-swap attempts before a write gives up with [`StoreError::Contention`].
pub const MAX_SWAP_ATTEMPTS: usize = 8;

const SCAN_COUNT: usize = 1000;

#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    prefix: String,
}

/// A document together with the exact JSON it was read from.
struct Stored {
    raw: String,
    document: Value,
}

/// Result of one conditional update.
enum Swap {
    Missing,
    Unchanged(Value),
    Replaced(Value),
}

impl RedisStore {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        Self {
            conn,
            prefix: prefix.into(),
        }
    }

    /// Opens a managed connection to `url`.
    pub async fn connect(url: &str, prefix: impl Into<String>) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self::new(conn, prefix))
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn key_context(&self) -> KeyContext<'_> {
        KeyContext::new(&self.prefix)
    }

    /// Deletes every key under this store's prefix and returns how many were removed.
    pub async fn clear(&self) -> Result<u64, StoreError> {
        let mut conn = self.conn.clone();
        let pattern = self.key_context().prefix_pattern();
        let mut cursor: u64 = 0;
        let mut total_deleted: u64 = 0;

        loop {
            let (next_cursor, keys): (u64, Vec<String>) = cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_COUNT)
                .query_async(&mut conn)
                .await?;

            if !keys.is_empty() {
                let deleted: u64 = cmd("DEL").arg(&keys).query_async(&mut conn).await?;
                total_deleted += deleted;
            }

            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }

        Ok(total_deleted)
    }

    async fn load(
        &self,
        conn: &mut ConnectionManager,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Stored>, StoreError> {
        let key = self.key_context().document(collection.name(), id);
        let raw: Option<String> = conn.get(&key).await?;
        raw.map(parse_stored).transpose()
    }

    /// Documents matching `filter`, newest first.
    ///
    /// A filter pinning the id or a unique field is resolved with direct key
    /// lookups; anything else walks the collection index.
    async fn candidates(
        &self,
        conn: &mut ConnectionManager,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<Stored>, StoreError> {
        let keys = self.key_context();

        let pinned = if let Some(id) = filter.pinned_id() {
            Some(id.to_string())
        } else if let Some((field, value)) = filter.pinned_unique(collection) {
            let owner: Option<String> = conn.get(keys.unique(collection.name(), field, value)).await?;
            match owner {
                Some(owner) => Some(owner),
                None => return Ok(Vec::new()),
            }
        } else {
            None
        };

        if let Some(id) = pinned {
            let stored = self.load(conn, collection, &id).await?;
            return Ok(stored.into_iter().filter(|s| filter.matches(&s.document)).collect());
        }

        let ids: Vec<String> = conn.zrevrange(keys.index(collection.name()), 0, -1).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let document_keys: Vec<String> = ids.iter().map(|id| keys.document(collection.name(), id)).collect();
        let raws: Vec<Option<String>> = cmd("MGET").arg(&document_keys).query_async(conn).await?;

        let mut matches = Vec::new();
        for raw in raws.into_iter().flatten() {
            let stored = parse_stored(raw)?;
            if filter.matches(&stored.document) {
                matches.push(stored);
            }
        }
        Ok(matches)
    }

    /// Claims and releases needed to move the unique values of `before` to those of `after`.
    fn unique_changes(&self, collection: Collection, before: &Value, after: &Value) -> (Vec<UniqueClaim>, Vec<String>) {
        let keys = self.key_context();
        let mut claims = Vec::new();
        let mut releases = Vec::new();
        for field in collection.unique_fields() {
            let old = unique_value(before, field);
            let new = unique_value(after, field);
            if old == new {
                continue;
            }
            if let Some(old) = old {
                releases.push(keys.unique(collection.name(), field, old));
            }
            if let Some(new) = new {
                claims.push(UniqueClaim {
                    key: keys.unique(collection.name(), field, new),
                    field: (*field).to_string(),
                    value: new.to_string(),
                });
            }
        }
        (claims, releases)
    }

    async fn swap(
        &self,
        conn: &mut ConnectionManager,
        collection: Collection,
        filter: &Filter,
        update: &Update,
    ) -> Result<Swap, StoreError> {
        let mut contended = self.key_context().index(collection.name());
        for attempt in 1..=MAX_SWAP_ATTEMPTS {
            let Some(current) = self.candidates(conn, collection, filter).await?.into_iter().next() else {
                return Ok(Swap::Missing);
            };

            let mut next = current.document.clone();
            update.apply(&mut next)?;
            if next == current.document {
                return Ok(Swap::Unchanged(next));
            }

            let id = document_id(&next)?.to_string();
            let (claims, releases) = self.unique_changes(collection, &current.document, &next);
            let command = ReplaceCommand {
                document_key: self.key_context().document(collection.name(), &id),
                expected: current.raw,
                document: serde_json::to_string(&next)?,
                id,
                claims,
                releases,
            };

            match run_script(conn, &DOCUMENT_REPLACE_SCRIPT, collection, &command).await? {
                ScriptOutcome::Applied => return Ok(Swap::Replaced(next)),
                ScriptOutcome::Stale | ScriptOutcome::Missing => {
                    debug!("replace of {} lost a race (attempt {attempt})", command.document_key);
                    contended = command.document_key;
                }
            }
        }
        Err(StoreError::Contention { key: contended })
    }

    async fn remove(
        &self,
        conn: &mut ConnectionManager,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Value>, StoreError> {
        let keys = self.key_context();
        let mut contended = keys.index(collection.name());
        for attempt in 1..=MAX_SWAP_ATTEMPTS {
            let Some(current) = self.candidates(conn, collection, filter).await?.into_iter().next() else {
                return Ok(None);
            };

            let id = document_id(&current.document)?.to_string();
            let releases = collection
                .unique_fields()
                .iter()
                .filter_map(|field| {
                    unique_value(&current.document, field).map(|value| keys.unique(collection.name(), field, value))
                })
                .collect();
            let command = DeleteCommand {
                document_key: keys.document(collection.name(), &id),
                index_key: keys.index(collection.name()),
                expected: current.raw,
                id,
                releases,
            };

            match run_script(conn, &DOCUMENT_DELETE_SCRIPT, collection, &command).await? {
                ScriptOutcome::Applied => return Ok(Some(current.document)),
                ScriptOutcome::Stale | ScriptOutcome::Missing => {
                    debug!("delete of {} lost a race (attempt {attempt})", command.document_key);
                    contended = command.document_key;
                }
            }
        }
        Err(StoreError::Contention { key: contended })
    }
}

fn parse_stored(raw: String) -> Result<Stored, StoreError> {
    let document = serde_json::from_str(&raw)?;
    Ok(Stored { raw, document })
}

fn ids_of(stored: &[Stored]) -> Result<Vec<String>, StoreError> {
    stored
        .iter()
        .map(|s| document_id(&s.document).map(str::to_string))
        .collect()
}

impl DocumentStore for RedisStore {
    async fn insert_one(&self, collection: Collection, document: Value) -> Result<Value, StoreError> {
        let mut conn = self.conn.clone();
        let keys = self.key_context();
        let id = document_id(&document)?.to_string();
        let (claims, _) = self.unique_changes(collection, &Value::Null, &document);
        let command = InsertCommand {
            document_key: keys.document(collection.name(), &id),
            index_key: keys.index(collection.name()),
            sequence_key: keys.sequence(collection.name()),
            document: serde_json::to_string(&document)?,
            id,
            claims,
        };
        match run_script(&mut conn, &DOCUMENT_INSERT_SCRIPT, collection, &command).await? {
            ScriptOutcome::Applied => Ok(document),
            other => Err(StoreError::Script {
                code: format!("unexpected insert outcome {other:?}"),
            }),
        }
    }

    async fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Option<Value>, StoreError> {
        let mut conn = self.conn.clone();
        let found = self.candidates(&mut conn, collection, filter).await?;
        Ok(found.into_iter().next().map(|stored| stored.document))
    }

    async fn find_many(&self, collection: Collection, filter: &Filter) -> Result<Vec<Value>, StoreError> {
        let mut conn = self.conn.clone();
        let found = self.candidates(&mut conn, collection, filter).await?;
        Ok(found.into_iter().map(|stored| stored.document).collect())
    }

    async fn find_one_and_update(
        &self,
        collection: Collection,
        filter: &Filter,
        update: &Update,
    ) -> Result<Option<Value>, StoreError> {
        let mut conn = self.conn.clone();
        match self.swap(&mut conn, collection, filter, update).await? {
            Swap::Missing => Ok(None),
            Swap::Unchanged(document) | Swap::Replaced(document) => Ok(Some(document)),
        }
    }

    async fn find_one_and_delete(&self, collection: Collection, filter: &Filter) -> Result<Option<Value>, StoreError> {
        let mut conn = self.conn.clone();
        self.remove(&mut conn, collection, filter).await
    }

    async fn update_many(&self, collection: Collection, filter: &Filter, update: &Update) -> Result<u64, StoreError> {
        let mut conn = self.conn.clone();
        let ids = ids_of(&self.candidates(&mut conn, collection, filter).await?)?;
        let mut modified = 0;
        for id in ids {
            let scoped = Filter::by_id(&id).and(filter.clone());
            if let Swap::Replaced(_) = self.swap(&mut conn, collection, &scoped, update).await? {
                modified += 1;
            }
        }
        Ok(modified)
    }

    async fn delete_many(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError> {
        let mut conn = self.conn.clone();
        let ids = ids_of(&self.candidates(&mut conn, collection, filter).await?)?;
        let mut removed = 0;
        for id in ids {
            let scoped = Filter::by_id(&id).and(filter.clone());
            if self.remove(&mut conn, collection, &scoped).await?.is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: String = cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
