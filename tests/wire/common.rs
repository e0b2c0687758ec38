//! Axum mock of the vector REST service.
//!
//! Stores raw records per namespace and records every request it sees so
//! tests can assert on paths, headers and bodies.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::{Json, Router};
use quiver::{Index, IndexConfig, RetryConfig};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const TOKEN: &str = "test-token";

#[derive(Debug, Clone)]
pub struct Seen {
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Value,
}

#[derive(Default)]
pub struct MockState {
    namespaces: Mutex<BTreeMap<String, BTreeMap<String, Value>>>,
    seen: Mutex<Vec<Seen>>,
    delay: Mutex<Option<Duration>>,
}

pub struct MockServer {
    pub url: String,
    pub state: Arc<MockState>,
}

impl MockServer {
    /// Serve on an ephemeral port.
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        Self::serve(listener)
    }

    /// Serve on an already bound listener.
    pub fn serve(listener: TcpListener) -> Self {
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(MockState::default());
        let app = Router::new().fallback(handle).with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}", addr),
            state,
        }
    }

    /// Config pointing at this server with the expected token and no retries.
    pub fn config(&self) -> IndexConfig {
        IndexConfig::new(self.url.clone(), TOKEN).with_retry(RetryConfig::Disabled)
    }

    pub fn index(&self) -> Index {
        Index::new(self.config()).unwrap()
    }

    /// Hold every response for `delay` before answering.
    pub fn slow_down(&self, delay: Duration) {
        *self.state.delay.lock().unwrap() = Some(delay);
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.state.seen.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.seen()
            .into_iter()
            .map(|s| match s.query {
                Some(q) => format!("{}?{}", s.path, q),
                None => s.path,
            })
            .collect()
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    uri: Uri,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let path = uri.path().trim_start_matches('/').to_string();
    let query = uri.query().map(String::from);
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    state.seen.lock().unwrap().push(Seen {
        path: path.clone(),
        query: query.clone(),
        headers: headers.clone(),
        body: body.clone(),
    });

    let expected = format!("Bearer {}", TOKEN);
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(expected.as_str());
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Unauthorized"})),
        );
    }

    let delay = *state.delay.lock().unwrap();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    match dispatch(&state, &path, query.as_deref() == Some("all"), body) {
        Ok(result) => (StatusCode::OK, Json(json!({ "result": result }))),
        Err(message) => (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))),
    }
}

fn dispatch(state: &MockState, path: &str, all: bool, body: Value) -> Result<Value, String> {
    let (verb, ns) = match path.split_once('/') {
        Some((verb, ns)) => (verb, ns.to_string()),
        None => (path, String::new()),
    };
    let mut namespaces = state.namespaces.lock().unwrap();

    match verb {
        "upsert" | "upsert-data" => {
            let records = body.as_array().ok_or("expected an array")?;
            let space = namespaces.entry(ns).or_default();
            for record in records {
                let id = record["id"].as_str().ok_or("record without id")?;
                space.insert(id.to_string(), record.clone());
            }
            Ok(json!("Success"))
        }
        "fetch" => {
            let ids = body["ids"].as_array().ok_or("expected ids")?;
            let with_metadata = body["includeMetadata"] == json!(true);
            let space = namespaces.entry(ns).or_default();
            let found: Vec<Value> = ids
                .iter()
                .map(|id| match id.as_str().and_then(|id| space.get(id)) {
                    Some(record) => {
                        let mut out = json!({"id": record["id"]});
                        if with_metadata && !record["metadata"].is_null() {
                            out["metadata"] = record["metadata"].clone();
                        }
                        out
                    }
                    None => Value::Null,
                })
                .collect();
            Ok(Value::Array(found))
        }
        "reset" => {
            if all {
                namespaces.values_mut().for_each(BTreeMap::clear);
            } else if let Some(space) = namespaces.get_mut(&ns) {
                space.clear();
            }
            Ok(json!("Success"))
        }
        "info" => {
            namespaces.entry(String::new()).or_default();
            let per_ns: serde_json::Map<String, Value> = namespaces
                .iter()
                .map(|(name, space)| {
                    (
                        name.clone(),
                        json!({"vectorCount": space.len(), "pendingVectorCount": 0}),
                    )
                })
                .collect();
            let total: usize = namespaces.values().map(BTreeMap::len).sum();
            Ok(json!({
                "vectorCount": total,
                "pendingVectorCount": 0,
                "indexSize": 0,
                "dimension": 2,
                "similarityFunction": "COSINE",
                "namespaces": per_ns
            }))
        }
        "resumable-query" | "resumable-query-data" => {
            let top_k = body["topK"].as_u64().unwrap_or(0) as usize;
            let space = namespaces.entry(ns).or_default();
            let scores: Vec<Value> = space
                .keys()
                .take(top_k)
                .map(|id| json!({"id": id, "score": 1.0}))
                .collect();
            Ok(json!({"uuid": "wire-session", "scores": scores}))
        }
        "resumable-query-next" => {
            if body["uuid"] != json!("wire-session") {
                return Err("unknown session".into());
            }
            Ok(json!([{"id": "extra", "score": 0.5}]))
        }
        "resumable-query-end" => {
            if body["uuid"] != json!("wire-session") {
                return Err("unknown session".into());
            }
            Ok(json!("Success"))
        }
        other => Err(format!("unsupported endpoint: {}", other)),
    }
}
