use serde::Serialize;

/// A unique value a write wants to own.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UniqueClaim {
    pub key: String,
    pub field: String,
    pub value: String,
}

/// Payload for `document_insert.lua`.
#[derive(Debug, Serialize)]
pub struct InsertCommand {
    pub document_key: String,
    pub index_key: String,
    pub sequence_key: String,
    pub id: String,
    pub document: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub claims: Vec<UniqueClaim>,
}

/// Payload for `document_replace.lua`.
///
/// `expected` is the exact JSON read before the update was computed; the swap
/// only happens if the stored document still equals it.
#[derive(Debug, Serialize)]
pub struct ReplaceCommand {
    pub document_key: String,
    pub id: String,
    pub expected: String,
    pub document: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub claims: Vec<UniqueClaim>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub releases: Vec<String>,
}

/// Payload for `document_delete.lua`.
#[derive(Debug, Serialize)]
pub struct DeleteCommand {
    pub document_key: String,
    pub index_key: String,
    pub id: String,
    pub expected: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub releases: Vec<String>,
}
