//! Shared fixtures: manifest files on disk and an in-process mock backend.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::{Path as UrlPath, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use serde_json::Value;
use tokio::sync::Notify;

/// Write `contents` to `dir/name` and return the full path.
pub fn write_manifest(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write manifest");
    path
}

pub fn asset_manifest(id: &str) -> String {
    format!("kind: Asset\nspec:\n  id: {}\n  display_name: Asset {}\n", id, id)
}

/// A request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct Received {
    pub kind: String,
    pub content_kind: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

#[derive(Default)]
struct Gate {
    arrived: Notify,
    release: Notify,
}

#[derive(Clone, Default)]
struct BackendState {
    received: Arc<Mutex<Vec<Received>>>,
    /// 1-based request number answered with 500.
    fail_on: Option<usize>,
    gate: Option<Arc<Gate>>,
}

pub struct MockBackend {
    pub url: String,
    state: BackendState,
}

impl MockBackend {
    /// Answers every request with 200.
    pub async fn start() -> Self {
        Self::serve(BackendState::default()).await
    }

    /// Answers request number `n` (1-based) with 500, everything else with 200.
    pub async fn failing_on(n: usize) -> Self {
        Self::serve(BackendState {
            fail_on: Some(n),
            ..Default::default()
        })
        .await
    }

    /// Holds every response until [`MockBackend::release`] is called.
    pub async fn holding() -> Self {
        Self::serve(BackendState {
            gate: Some(Arc::new(Gate::default())),
            ..Default::default()
        })
        .await
    }

    async fn serve(state: BackendState) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Failed to read local addr");

        let app = Router::new()
            .route("/{kind}", post(handle))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock backend failed");
        });

        Self {
            url: format!("http://{}", addr),
            state,
        }
    }

    pub fn received(&self) -> Vec<Received> {
        self.state.received.lock().expect("lock poisoned").clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.received.lock().expect("lock poisoned").len()
    }

    /// Wait until a held request has reached the handler.
    pub async fn wait_for_request(&self) {
        if let Some(gate) = &self.state.gate {
            gate.arrived.notified().await;
        }
    }

    pub fn release(&self) {
        if let Some(gate) = &self.state.gate {
            gate.release.notify_one();
        }
    }
}

/// Address nothing is listening on.
pub async fn closed_backend_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read local addr");
    drop(listener);
    format!("http://{}", addr)
}

async fn handle(
    State(state): State<BackendState>,
    UrlPath(kind): UrlPath<String>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let number = {
        let mut received = state.received.lock().expect("lock poisoned");
        received.push(Received {
            kind,
            content_kind: header("content-kind"),
            content_type: header("content-type"),
            body: serde_json::from_slice(&body).unwrap_or(Value::Null),
        });
        received.len()
    };

    if let Some(gate) = &state.gate {
        gate.arrived.notify_one();
        gate.release.notified().await;
    }

    if state.fail_on == Some(number) {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    }
}
