/// Redis key-construction helpers for one key prefix.
#[derive(Debug, Clone)]
pub struct KeyContext<'a> {
    pub prefix: &'a str,
}

impl<'a> KeyContext<'a> {
    pub fn new(prefix: &'a str) -> Self {
        Self { prefix }
    }

    /// Key holding one document's JSON.
    pub fn document(&self, collection: &str, id: &str) -> String {
        format!("{}:{}:doc:{}", self.prefix, collection, id)
    }

    /// Sorted set of every id in a collection, scored by insertion sequence.
    pub fn index(&self, collection: &str) -> String {
        format!("{}:{}:index", self.prefix, collection)
    }

    /// Monotonic counter feeding the index scores.
    pub fn sequence(&self, collection: &str) -> String {
        format!("{}:{}:seq", self.prefix, collection)
    }

    /// Key claiming a unique field value for the document that owns it.
    pub fn unique(&self, collection: &str, field: &str, value: &str) -> String {
        format!("{}:{}:unique:{}:{}", self.prefix, collection, field, value)
    }

    /// Glob matching every key under this prefix (test cleanup).
    pub fn prefix_pattern(&self) -> String {
        format!("{}:*", self.prefix)
    }
}
