use serde::{Deserialize, Serialize};

/// Body of a create request, and the value type of the fetch mapping. The
/// store never returns an id inside the record itself; the mapping key is
/// the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostBody {
    pub title: String,
    pub content: String,
}

/// Response to a create request: the key the store assigned to the new post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResponse {
    pub name: String,
}
