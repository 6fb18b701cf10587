use redis::Script;
use std::sync::LazyLock;

pub const DOCUMENT_INSERT_SCRIPT_BODY: &str = include_str!("../../../lua/document_insert.lua");
pub const DOCUMENT_REPLACE_SCRIPT_BODY: &str = include_str!("../../../lua/document_replace.lua");
pub const DOCUMENT_DELETE_SCRIPT_BODY: &str = include_str!("../../../lua/document_delete.lua");

pub static DOCUMENT_INSERT_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(DOCUMENT_INSERT_SCRIPT_BODY));
pub static DOCUMENT_REPLACE_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(DOCUMENT_REPLACE_SCRIPT_BODY));
pub static DOCUMENT_DELETE_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(DOCUMENT_DELETE_SCRIPT_BODY));
