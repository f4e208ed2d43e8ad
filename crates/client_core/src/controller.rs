//! Binds the gateway's broadcasts and operations to UI-facing state.

use std::sync::Arc;

use shared::domain::Post;
use tokio::{sync::Mutex, task::JoinHandle};

use crate::PostsGateway;

/// UI-facing state: a loading flag, the last error message from any
/// source, and the current full snapshot of posts.
#[derive(Debug, Clone, Default)]
pub struct ControllerState {
    pub loading: bool,
    pub error: Option<String>,
    pub posts: Vec<Post>,
}

/// Owns the record list shown to the user and the two standing
/// subscriptions to the gateway's broadcast channels. Mutations happen
/// only from its own methods and the two listener tasks; last-writer-wins
/// ordering under concurrent loads is accepted.
pub struct PostsController {
    gateway: Arc<PostsGateway>,
    state: Arc<Mutex<ControllerState>>,
    posts_task: JoinHandle<()>,
    errors_task: JoinHandle<()>,
}

impl PostsController {
    /// Build the controller and attach its standing subscriptions: one
    /// task replaces `posts` on every `posts_changed` broadcast, the other
    /// replaces `error` on every `errors` broadcast. Both live until
    /// [`teardown`](Self::teardown). Must be called inside a runtime.
    pub fn spawn(gateway: Arc<PostsGateway>) -> Self {
        let state = Arc::new(Mutex::new(ControllerState::default()));

        let mut posts_rx = gateway.subscribe_posts();
        let posts_task = {
            let state = Arc::clone(&state);
            tokio::spawn(async move {
                while let Ok(posts) = posts_rx.recv().await {
                    state.lock().await.posts = posts;
                }
            })
        };

        let mut errors_rx = gateway.subscribe_errors();
        let errors_task = {
            let state = Arc::clone(&state);
            tokio::spawn(async move {
                while let Ok(message) = errors_rx.recv().await {
                    state.lock().await.error = Some(message);
                }
            })
        };

        Self {
            gateway,
            state,
            posts_task,
            errors_task,
        }
    }

    /// Snapshot of the current state, for rendering.
    pub async fn state(&self) -> ControllerState {
        self.state.lock().await.clone()
    }

    /// Raise `loading` and fetch a fresh snapshot. On success the snapshot
    /// replaces `posts` and `loading` drops; on failure only `error` is
    /// recorded and `loading` stays raised.
    pub async fn load_posts(&self) {
        self.state.lock().await.loading = true;
        match self.gateway.fetch_all().await {
            Ok(posts) => {
                let mut state = self.state.lock().await;
                state.loading = false;
                state.posts = posts;
            }
            Err(err) => {
                self.state.lock().await.error = Some(err.to_string());
            }
        }
    }

    /// Submit a draft. The outcome arrives through the broadcast channels,
    /// not through this call; `loading` is untouched.
    pub async fn submit_post(&self, title: &str, content: &str) {
        self.gateway.create_and_publish(title, content).await;
    }

    /// Delete the whole collection; the gateway emits no broadcast for
    /// this, so the controller clears its own list on success.
    pub async fn clear_all(&self) {
        match self.gateway.delete_all().await {
            Ok(()) => self.state.lock().await.posts.clear(),
            Err(err) => self.state.lock().await.error = Some(err.to_string()),
        }
    }

    /// Release both channel subscriptions. In-flight gateway requests are
    /// not cancelled; their completions fire into channels this controller
    /// no longer listens on.
    pub async fn teardown(self) {
        for task in [self.posts_task, self.errors_task] {
            task.abort();
            let _ = task.await;
        }
    }
}
