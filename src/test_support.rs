//! In-process stand-in for the flood-monitoring API, used by the async tests.
//!
//! Serves canned `(status, body)` pairs by request path and records every request
//! target (path plus query) it receives.

use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[derive(Default)]
struct MockState {
    routes: HashMap<String, (u16, String)>,
    requests: Vec<String>,
}

type SharedState = Arc<Mutex<MockState>>;

pub(crate) struct MockUpstream {
    addr: SocketAddr,
    state: SharedState,
    task: JoinHandle<()>,
}

impl MockUpstream {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock upstream");
        let addr = listener.local_addr().expect("mock upstream address");
        let state = SharedState::default();
        let app = Router::new().fallback(respond).with_state(state.clone());
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Self { addr, state, task }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Answers requests for `path` (query ignored) with `status` and `body`.
    pub fn respond(&self, path: &str, status: u16, body: &str) {
        self.state
            .lock()
            .unwrap()
            .routes
            .insert(path.to_string(), (status, body.to_string()));
    }

    /// Every request target received so far, oldest first.
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn request_count(&self, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|target| target.split('?').next() == Some(path))
            .count()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn respond(State(state): State<SharedState>, uri: Uri) -> impl IntoResponse {
    let target = uri
        .path_and_query()
        .map(|target| target.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    let mut state = state.lock().unwrap();
    state.requests.push(target);
    let (status, body) = state
        .routes
        .get(uri.path())
        .cloned()
        .unwrap_or_else(|| (404, r#"{"error": "not found"}"#.to_string()));

    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
}
