//! Mock Sourcing Service shared by the integration tests.
//!
//! Behaviour is keyed on the request:
//! - `query`/`text` containing `fail` → 503 `{"error": "rate limited"}`
//! - containing `crash` → 500 with an HTML body
//! - containing `empty` → 200 `{"results": null}`
//! - containing `proxy` → 200 with an HTML body
//! - anything else → 200 with three candidates and `count: 42`

#![allow(dead_code)]

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

pub type Seen = Arc<Mutex<Vec<(String, Value)>>>;

pub struct MockService {
    pub base_url: String,
    pub seen: Seen,
}

impl MockService {
    pub fn requests(&self) -> Vec<(String, Value)> {
        self.seen.lock().unwrap().clone()
    }
}

fn candidates() -> Value {
    json!([
        {
            "login": "octocat",
            "name": "The Octocat",
            "location": "San Francisco",
            "followers": 120,
            "public_repos": 8,
            "years_experience": 6,
            "languages_used": ["Rust", "Go"],
            "profile_url": "https://github.com/octocat"
        },
        {
            "login": "hubot",
            "followers": 3,
            "public_repos": 60,
            "years_experience": null,
            "profile_url": "https://github.com/hubot"
        },
        {
            "login": "mona",
            "name": "Mona Lisa",
            "followers": 45,
            "public_repos": 12,
            "years_experience": 11.5,
            "twitter": "mona",
            "profile_url": "https://github.com/mona"
        }
    ])
}

fn respond(key: &str) -> axum::response::Response {
    if key.contains("fail") {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "rate limited" })),
        )
            .into_response()
    } else if key.contains("crash") {
        (StatusCode::INTERNAL_SERVER_ERROR, "<h1>Internal Server Error</h1>").into_response()
    } else if key.contains("proxy") {
        (StatusCode::OK, "<html>proxy page</html>").into_response()
    } else if key.contains("empty") {
        Json(json!({ "results": null })).into_response()
    } else {
        Json(json!({ "count": 42, "results": candidates() })).into_response()
    }
}

async fn search(State(seen): State<Seen>, Json(body): Json<Value>) -> axum::response::Response {
    let key = body["query"].as_str().unwrap_or("").to_string();
    seen.lock().unwrap().push(("/search".to_string(), body));
    respond(&key)
}

async fn search_plain(
    State(seen): State<Seen>,
    Json(body): Json<Value>,
) -> axum::response::Response {
    let key = body["text"].as_str().unwrap_or("").to_string();
    seen.lock().unwrap().push(("/search-plain".to_string(), body));
    respond(&key)
}

/// Start the mock on an ephemeral port. It lives as long as the runtime.
pub async fn spawn_mock() -> MockService {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/search", post(search))
        .route("/search-plain", post(search_plain))
        .with_state(seen.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockService {
        base_url: format!("http://{}", addr),
        seen,
    }
}

/// An origin nothing listens on.
pub fn dead_origin() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}
