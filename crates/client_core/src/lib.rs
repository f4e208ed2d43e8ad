//! Async gateway to a remote JSON-document posts collection, plus the
//! controller that binds its broadcasts to UI-facing state.
//!
//! The store exposes one collection URL (`<base>/posts.json`) answering
//! GET (full mapping of key to stored fields), POST (store one record,
//! respond with the assigned key), and DELETE (drop the whole collection).
//! State changes and create-path errors fan out over two broadcast
//! channels; fetch and delete results return to the caller directly.

use std::sync::Arc;

use reqwest::Client;
use serde_json::Value;
use shared::{
    domain::{Post, PostId},
    protocol::{CreateResponse, PostBody},
};
use tokio::sync::broadcast;
use tracing::{info, warn};

pub mod controller;
pub mod error;

pub use controller::{ControllerState, PostsController};
pub use error::TransportError;

/// Fixed header attached to every create request.
const CUSTOM_HEADER_NAME: &str = "Custom-Header";
const CUSTOM_HEADER_VALUE: &str = "Hello";
/// Fixed query parameter attached to every create request.
const PRETTY_PRINT_QUERY: (&str, &str) = ("print", "pretty");
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// All network I/O against the posts collection. Holds no record state of
/// its own; snapshots flow to subscribers or back to the caller.
pub struct PostsGateway {
    http: Client,
    collection_url: String,
    posts_changed: broadcast::Sender<Vec<Post>>,
    errors: broadcast::Sender<String>,
}

impl PostsGateway {
    pub fn new(base_url: impl Into<String>) -> Arc<Self> {
        let base_url = base_url.into();
        let (posts_changed, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (errors, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            http: Client::new(),
            collection_url: format!("{}/posts.json", base_url.trim_end_matches('/')),
            posts_changed,
            errors,
        })
    }

    /// Full refreshed snapshots, broadcast after a successful
    /// create-then-refetch.
    pub fn subscribe_posts(&self) -> broadcast::Receiver<Vec<Post>> {
        self.posts_changed.subscribe()
    }

    /// Error messages from the create path, which never reports to its
    /// caller directly.
    pub fn subscribe_errors(&self) -> broadcast::Receiver<String> {
        self.errors.subscribe()
    }

    /// Fetch the full collection snapshot.
    ///
    /// The store responds with either JSON `null` (empty collection) or an
    /// object mapping each server-assigned key to the stored fields. Every
    /// key becomes that record's id, in exactly the order the decoded
    /// document yields. No retry on failure.
    pub async fn fetch_all(&self) -> Result<Vec<Post>, TransportError> {
        info!(url = %self.collection_url, "posts: fetch request sent");
        let document: Option<serde_json::Map<String, Value>> = self
            .http
            .get(&self.collection_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let posts = collect_posts(document)?;
        info!(count = posts.len(), "posts: fetch response received");
        Ok(posts)
    }

    /// Create a post, then re-fetch and broadcast the refreshed snapshot.
    ///
    /// Fire-and-forget: the caller never observes success or failure
    /// directly. A successful write followed by a successful re-fetch emits
    /// exactly one `posts_changed` broadcast; a failure at either step
    /// emits exactly one `errors` broadcast instead. The write and the
    /// re-read are not atomic, so a concurrent external write can appear in
    /// the broadcast snapshot.
    pub async fn create_and_publish(&self, title: &str, content: &str) {
        match self.create(title, content).await {
            Ok(response) => {
                info!(key = %response.name, "posts: create response received");
                match self.fetch_all().await {
                    Ok(posts) => {
                        let _ = self.posts_changed.send(posts);
                    }
                    Err(err) => {
                        warn!(error = %err, "posts: refetch after create failed");
                        let _ = self.errors.send(err.to_string());
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, "posts: create failed");
                let _ = self.errors.send(err.to_string());
            }
        }
    }

    async fn create(&self, title: &str, content: &str) -> Result<CreateResponse, TransportError> {
        info!(url = %self.collection_url, title, "posts: create request sent");
        let response = self
            .http
            .post(&self.collection_url)
            .header(CUSTOM_HEADER_NAME, CUSTOM_HEADER_VALUE)
            .query(&[PRETTY_PRINT_QUERY])
            .json(&PostBody {
                title: title.to_string(),
                content: content.to_string(),
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response)
    }

    /// Delete the whole collection in one request. Emits no broadcast;
    /// callers clear their own snapshot on success.
    pub async fn delete_all(&self) -> Result<(), TransportError> {
        info!(url = %self.collection_url, "posts: delete request sent");
        self.http
            .delete(&self.collection_url)
            .send()
            .await?
            .error_for_status()?;
        info!("posts: delete response received");
        Ok(())
    }
}

/// Flatten the decoded mapping into an ordered post list, injecting each
/// mapping key as that record's id. `None` means the store is empty.
fn collect_posts(
    document: Option<serde_json::Map<String, Value>>,
) -> Result<Vec<Post>, TransportError> {
    let Some(document) = document else {
        return Ok(Vec::new());
    };
    let mut posts = Vec::with_capacity(document.len());
    for (key, value) in document {
        let body: PostBody = serde_json::from_value(value)
            .map_err(|e| TransportError::new(format!("malformed post under key {key}: {e}")))?;
        posts.push(Post {
            id: PostId(key),
            title: body.title,
            content: body.content,
        });
    }
    Ok(posts)
}

#[cfg(test)]
mod tests;
