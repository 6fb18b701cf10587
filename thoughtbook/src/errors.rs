use std::borrow::Cow;

use thiserror::Error;

/// Failure raised by a document store adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying Redis command failed.
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// A document could not be encoded or decoded.
    #[error("serialization error: {message}")]
    Serialization { message: Cow<'static, str> },

    /// A unique index already holds the value on another document.
    #[error("unique index violation on {collection}.{field}: '{value}' already belongs to '{existing_id}'")]
    UniqueViolation {
        collection: String,
        field: String,
        value: String,
        existing_id: String,
    },

    /// An update could not be applied to the stored document shape.
    #[error("invalid update at `{path}`: {message}")]
    InvalidUpdate { path: String, message: Cow<'static, str> },

    /// The document kept changing underneath a compare-and-swap.
    #[error("document {key} changed concurrently; giving up after repeated attempts")]
    Contention { key: String },

    /// A Lua script returned a status the adapter does not understand.
    #[error("store script failed: {code}")]
    Script { code: String },

    /// An in-process lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization {
            message: Cow::Owned(err.to_string()),
        }
    }
}

/// Errors surfaced by relationship-integrity operations.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Validation failed for one or more fields.
    #[error("validation failed")]
    Validation(#[from] ValidationError),

    /// A referenced entity does not exist.
    #[error("{entity} not found ({key})")]
    NotFound { entity: &'static str, key: String },

    /// The requested relationship already exists.
    #[error("{message}")]
    Conflict { message: String },

    /// The document store failed.
    #[error("store error: {0}")]
    Store(StoreError),
}

impl GraphError {
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        GraphError::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        GraphError::Conflict {
            message: message.into(),
        }
    }
}

impl From<StoreError> for GraphError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { field, value, .. } => GraphError::Validation(ValidationError::single(
                field.clone(),
                "validation.unique",
                format!("{field} '{value}' is already taken"),
            )),
            other => GraphError::Store(other),
        }
    }
}

/// Collection of validation issues encountered while preparing a write.
#[derive(Debug, Error)]
#[error("validation errors: {issues:?}")]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new<I>(issues: I) -> Self
    where
        I: IntoIterator<Item = ValidationIssue>,
    {
        Self {
            issues: issues.into_iter().collect(),
        }
    }

    /// Convenience helper for constructing a single-field validation error.
    pub fn single(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new([ValidationIssue::new(field, code, message)])
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Human-readable summary of every issue, in order.
    pub fn summary(&self) -> String {
        self.issues
            .iter()
            .map(|issue| format!("{}: {}", issue.field, issue.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Detailed validation failure for a single field.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ValidationIssue {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;
