//! Action proxy routes: `POST /init` and `POST /run`.

use crate::dispatcher::execute;
use crate::state::AppState;
use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tower_http::limit::RequestBodyLimitLayer;

/// Invocation payloads are small argument bags.
const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Deserialize)]
pub struct RunRequest {
    #[serde(default)]
    pub value: Map<String, Value>,
}

/// Code is compiled in; init only acknowledges.
async fn init() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// Always 200: failures travel inside the envelope.
async fn run(State(state): State<AppState>, Json(req): Json<RunRequest>) -> Json<Value> {
    Json(execute(&state, Value::Object(req.value)).await)
}

pub fn action_routes(state: AppState) -> Router {
    Router::new()
        .route("/init", post(init))
        .route("/run", post(run))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}
