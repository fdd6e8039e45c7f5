//! Shared test infrastructure for integration tests.

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::path::Path;
use std::process::{Command, Output};
use std::sync::{Arc, Mutex};

/// Result of one `ontogen` invocation.
#[derive(Debug)]
pub struct RunResult {
    pub stdout: String,
    pub document: serde_json::Value,
    pub success: bool,
}

/// Run the compiled binary with an isolated environment.
pub fn run_ontogen(args: &[&str], cache_dir: &Path) -> RunResult {
    let bin = env!("CARGO_BIN_EXE_ontogen");
    let output: Output = Command::new(bin)
        .args(args)
        .env_remove("ONTOGEN_BASE_URL")
        .env_remove("ONTOGEN_MODEL")
        .env_remove("RUST_LOG")
        .env("ONTOGEN_CACHE_DIR", cache_dir)
        .output()
        .expect("run ontogen");
    let stdout = String::from_utf8(output.stdout).expect("stdout is UTF-8");
    let document = serde_json::from_str(stdout.trim()).unwrap_or_else(|err| {
        panic!("stdout is not one JSON document ({err}): {stdout}");
    });
    RunResult {
        stdout,
        document,
        success: output.status.success(),
    }
}

/// A request seen by the stub server.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub path: String,
    pub body: String,
}

#[derive(Clone, Default)]
struct StubState {
    script: Arc<Mutex<VecDeque<(u16, String)>>>,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

/// Local HTTP server standing in for an Ollama endpoint.
///
/// `/api/tags` always answers 200. Each `/api/generate` call pops the next
/// scripted `(status, response_text)`; an empty script answers 500.
pub struct StubServer {
    pub base_url: String,
    state: StubState,
    _runtime: tokio::runtime::Runtime,
}

impl StubServer {
    pub fn start(script: Vec<(u16, String)>) -> Self {
        let state = StubState {
            script: Arc::new(Mutex::new(script.into())),
            ..StubState::default()
        };
        let app = Router::new()
            .route("/api/tags", get(tags))
            .route("/api/generate", post(generate))
            .with_state(state.clone());

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("build stub runtime");
        let listener = runtime
            .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
            .expect("bind stub server");
        let addr = listener.local_addr().expect("stub address");
        runtime.spawn(async move {
            axum::serve(listener, app).await.expect("serve stub");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            _runtime: runtime,
        }
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.state.seen.lock().expect("seen lock").clone()
    }

    pub fn generate_requests(&self) -> Vec<SeenRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == "/api/generate")
            .collect()
    }
}

fn record(state: &StubState, uri: &Uri, body: String) {
    state.seen.lock().expect("seen lock").push(SeenRequest {
        path: uri.path().to_string(),
        body,
    });
}

async fn tags(State(state): State<StubState>, uri: Uri) -> Json<Value> {
    record(&state, &uri, String::new());
    Json(json!({ "models": [] }))
}

async fn generate(
    State(state): State<StubState>,
    uri: Uri,
    body: String,
) -> (StatusCode, Json<Value>) {
    record(&state, &uri, body);
    let next = state.script.lock().expect("script lock").pop_front();
    match next {
        Some((status, text)) => (
            StatusCode::from_u16(status).expect("valid scripted status"),
            Json(json!({ "response": text })),
        ),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "script exhausted" })),
        ),
    }
}
