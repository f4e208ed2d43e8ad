use serde::{Deserialize, Serialize};

/// Opaque server-assigned key identifying a persisted post. Two posts are
/// the same entity iff their ids match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostId(pub String);

impl PostId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A post as persisted in the remote document store. Drafts carry no id;
/// the id exists only once the server has assigned a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
}
