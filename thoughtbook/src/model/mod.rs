//! Documents stored in the two collections and the shapes they take on output.
//!
//! - [`User`] and [`Thought`] are the stored documents.
//! - [`Reaction`] lives inside its parent thought and has no collection of its own.
//! - The `New*` and `*Patch` types are validated request payloads.
//! - [`view`] holds the populated, camelCase output representations.

mod format;
mod thought;
mod user;
pub mod view;

pub use format::format_timestamp;
pub use thought::{NewReaction, NewThought, Reaction, Thought, ThoughtPatch};
pub use user::{NewUser, User, UserPatch};

use serde::{Serialize, de::DeserializeOwned};

use crate::store::Collection;

/// A document type persisted in its own collection.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    /// Collection the documents of this type live in.
    const COLLECTION: Collection;

    /// Name used in not-found errors.
    const LABEL: &'static str;

    /// Identifier of this document.
    fn id(&self) -> &str;
}

/// Document key every entity stores its identifier under.
pub const ID_FIELD: &str = "id";
