//! Shared helpers for the HTTP integration tests.
//!
//! Every test gets its own in-memory database and a stub auth service bound to
//! an ephemeral local port.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get as route_get;
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower::ServiceExt;
use uuid::Uuid;

use user_activity::auth::AuthClient;
use user_activity::auth::circuit_breaker::BreakerConfig;
use user_activity::db;
use user_activity::routes;
use user_activity::state::AppState;

/// Token the stub answers with 401.
pub const EXPIRED_TOKEN: &str = "expired";
/// Token the stub answers with 500.
pub const BROKEN_TOKEN: &str = "broken";

#[derive(Clone)]
struct StubState {
    users: Arc<HashMap<String, Uuid>>,
    hits: Arc<AtomicUsize>,
}

/// A running stub of the auth service's identity endpoint.
pub struct AuthStub {
    pub url: String,
    hits: Arc<AtomicUsize>,
}

impl AuthStub {
    /// Number of requests the stub has received.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn me(State(stub): State<StubState>, headers: HeaderMap) -> Response {
    stub.hits.fetch_add(1, Ordering::SeqCst);
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .unwrap_or_default();

    if token == BROKEN_TOKEN {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    match stub.users.get(token) {
        Some(sub) => Json(json!({ "sub": sub, "role": ["user"] })).into_response(),
        None => StatusCode::UNAUTHORIZED.into_response(),
    }
}

/// Start a stub auth service that knows `users` (token -> user id).
pub async fn spawn_auth_stub(users: &[(&str, Uuid)]) -> AuthStub {
    let hits = Arc::new(AtomicUsize::new(0));
    let state = StubState {
        users: Arc::new(
            users
                .iter()
                .map(|(token, id)| (token.to_string(), *id))
                .collect(),
        ),
        hits: hits.clone(),
    };
    let router = Router::new()
        .route("/api/v1/users/me", route_get(me))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    AuthStub {
        url: format!("http://{addr}/api/v1/users/me"),
        hits,
    }
}

/// Build the application router against a fresh in-memory database.
pub async fn build_test_app(auth_url: &str, breaker: BreakerConfig) -> Router {
    let pool = db::connect_in_memory().await.unwrap();
    let auth = AuthClient::new(auth_url, Duration::from_secs(2), breaker).unwrap();
    routes::app(AppState::new(pool, auth))
}

/// Issue a request against `app`, optionally authenticated and with a JSON body.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> Response {
    send(app, Method::GET, uri, token, None).await
}

pub async fn post_json(app: &Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

/// Read the whole response body as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
