//! Thoughtbook core library.
//!
//! Users post thoughts, react to each other's thoughts, and keep friend lists.
//! Relations span two collections in a store that is only atomic per document;
//! [`graph::SocialGraph`] sequences the writes and reads tolerate what an
//! interrupted sequence leaves behind.

pub mod api;
pub mod config;
pub mod errors;
pub mod graph;
pub mod id;
pub mod keys;
pub mod model;
pub mod repository;
pub mod store;
pub mod validators;

pub use errors::*;
pub use graph::{DeletedUser, SocialGraph};
pub use repository::Repo;
pub use store::{Collection, DocumentStore, Filter, MemoryStore, RedisStore, Update};

// Re-export redis so callers building a `RedisStore` by hand use the same version.
pub use redis;
pub use redis::aio::ConnectionManager;
