use std::borrow::Cow;

use redis::{Script, aio::ConnectionLike};
use serde::Serialize;
use serde_json::Value;

use crate::{errors::StoreError, store::Collection};

/// What a conditional write script reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptOutcome {
    /// The write happened.
    Applied,
    /// The document changed since it was read; re-read and try again.
    Stale,
    /// The document disappeared since it was read.
    Missing,
}

/// Runs one script with a JSON payload and decodes its JSON status reply.
pub async fn run_script<C, P>(
    conn: &mut C,
    script: &Script,
    collection: Collection,
    payload: &P,
) -> Result<ScriptOutcome, StoreError>
where
    C: ConnectionLike + Send,
    P: Serialize,
{
    let payload = serde_json::to_string(payload)?;
    let mut invocation = script.prepare_invoke();
    invocation.arg(payload);
    let raw: String = invocation.invoke_async(conn).await?;
    decode_reply(collection, &raw)
}

fn decode_reply(collection: Collection, raw: &str) -> Result<ScriptOutcome, StoreError> {
    let value: Value = serde_json::from_str(raw).map_err(|err| StoreError::Serialization {
        message: Cow::Owned(format!("failed to parse lua response: {err}")),
    })?;

    if let Some(code) = value.get("error").and_then(Value::as_str) {
        return match code {
            "unique_violation" => {
                let text = |name: &str| {
                    value
                        .get(name)
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .unwrap_or_default()
                };
                Err(StoreError::UniqueViolation {
                    collection: collection.name().to_string(),
                    field: text("field"),
                    value: text("value"),
                    existing_id: text("existing_id"),
                })
            }
            other => Err(StoreError::Script { code: other.to_string() }),
        };
    }

    match value.get("status").and_then(Value::as_str) {
        Some("applied") => Ok(ScriptOutcome::Applied),
        Some("stale") => Ok(ScriptOutcome::Stale),
        Some("missing") => Ok(ScriptOutcome::Missing),
        other => Err(StoreError::Script {
            code: other.unwrap_or("lua_error").to_string(),
        }),
    }
}
