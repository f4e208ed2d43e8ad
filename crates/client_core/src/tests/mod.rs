use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use shared::protocol::PostBody;
use tokio::{net::TcpListener, sync::Mutex};


/// In-process stand-in for the remote document store. Each verb's status
/// is overridable per test; create requests are captured with the header
/// and query string they arrived with.
#[derive(Clone)]
struct StoreState {
    document: Arc<Mutex<Value>>,
    fetch_status: StatusCode,
    create_status: StatusCode,
    delete_status: StatusCode,
    created: Arc<Mutex<Vec<CapturedCreate>>>,
}

#[derive(Debug, Clone)]
struct CapturedCreate {
    custom_header: Option<String>,
    query: Option<String>,
    body: PostBody,
}

impl StoreState {
    fn with_document(document: Value) -> Self {
        Self {
            document: Arc::new(Mutex::new(document)),
            fetch_status: StatusCode::OK,
            create_status: StatusCode::OK,
            delete_status: StatusCode::OK,
            created: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn empty() -> Self {
        Self::with_document(Value::Null)
    }

    fn failing_fetch(mut self) -> Self {
        self.fetch_status = StatusCode::INTERNAL_SERVER_ERROR;
        self
    }

    fn failing_create(mut self) -> Self {
        self.create_status = StatusCode::INTERNAL_SERVER_ERROR;
        self
    }

    fn failing_delete(mut self) -> Self {
        self.delete_status = StatusCode::INTERNAL_SERVER_ERROR;
        self
    }
}

async fn handle_fetch(State(state): State<StoreState>) -> (StatusCode, Json<Value>) {
    if state.fetch_status != StatusCode::OK {
        return (state.fetch_status, Json(Value::Null));
    }
    (StatusCode::OK, Json(state.document.lock().await.clone()))
}

async fn handle_create(
    State(state): State<StoreState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    Json(body): Json<PostBody>,
) -> (StatusCode, Json<Value>) {
    state.created.lock().await.push(CapturedCreate {
        custom_header: headers
            .get("Custom-Header")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        query,
        body,
    });
    if state.create_status != StatusCode::OK {
        return (state.create_status, Json(Value::Null));
    }
    (StatusCode::OK, Json(serde_json::json!({ "name": "-NfreshKey01" })))
}

async fn handle_delete(State(state): State<StoreState>) -> StatusCode {
    state.delete_status
}

async fn spawn_store_server(state: StoreState) -> Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route(
            "/posts.json",
            get(handle_fetch).post(handle_create).delete(handle_delete),
        )
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}
