//! In-memory cities backend for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use worldwise::state::City;

/// A captured request for assertions.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }
}

#[derive(Clone, Default)]
struct MockState {
    cities: Arc<Mutex<Vec<Value>>>,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    override_response: Arc<Mutex<Option<(u16, String)>>>,
    delay: Arc<Mutex<Duration>>,
    next_id: Arc<Mutex<i64>>,
}

/// json-server style backend: `/cities` and `/cities/{id}`.
pub struct MockBackend {
    pub addr: SocketAddr,
    state: MockState,
    shutdown: tokio::sync::watch::Sender<bool>,
}

impl MockBackend {
    pub async fn start() -> Self {
        Self::start_with(Vec::new()).await
    }

    /// Start a backend seeded with the given cities.
    pub async fn start_with(cities: Vec<City>) -> Self {
        let state = MockState::default();
        *state.cities.lock().await = cities
            .iter()
            .map(|city| serde_json::to_value(city).unwrap())
            .collect();
        *state.next_id.lock().await = 100;

        let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);

        let app = Router::new()
            .fallback(handle_request)
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.changed().await;
                })
                .await
                .ok();
        });

        Self {
            addr,
            state,
            shutdown: shutdown_tx,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Answer every following request with this status and body.
    pub async fn respond_with(&self, status: u16, body: &str) {
        *self.state.override_response.lock().await = Some((status, body.to_string()));
    }

    /// Hold every following response for `delay`.
    pub async fn set_delay(&self, delay: Duration) {
        *self.state.delay.lock().await = delay;
    }

    pub async fn captured_requests(&self) -> Vec<CapturedRequest> {
        self.state.requests.lock().await.clone()
    }

    pub async fn stored_cities(&self) -> Vec<Value> {
        self.state.cities.lock().await.clone()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

fn id_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_response(status: StatusCode, body: String) -> Response<Body> {
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn handle_request(State(state): State<MockState>, req: Request<Body>) -> Response<Body> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let content_type = req
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = axum::body::to_bytes(req.into_body(), 1024 * 1024)
        .await
        .unwrap_or_default()
        .to_vec();

    state.requests.lock().await.push(CapturedRequest {
        method: method.to_string(),
        path: path.clone(),
        content_type,
        body: body.clone(),
    });

    let delay = *state.delay.lock().await;
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    if let Some((status, body)) = state.override_response.lock().await.clone() {
        return json_response(StatusCode::from_u16(status).unwrap(), body);
    }

    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    let mut cities = state.cities.lock().await;
    match (method, segments.as_slice()) {
        (Method::GET, ["cities"]) => {
            json_response(StatusCode::OK, Value::Array(cities.clone()).to_string())
        }
        (Method::GET, ["cities", id]) => {
            match cities.iter().find(|city| id_text(&city["id"]) == *id) {
                Some(city) => json_response(StatusCode::OK, city.to_string()),
                None => json_response(StatusCode::NOT_FOUND, "{}".to_string()),
            }
        }
        (Method::POST, ["cities"]) => {
            let mut city: Value = match serde_json::from_slice(&body) {
                Ok(city) => city,
                Err(_) => return json_response(StatusCode::BAD_REQUEST, "{}".to_string()),
            };
            let mut next_id = state.next_id.lock().await;
            *next_id += 1;
            city["id"] = Value::from(*next_id);
            cities.push(city.clone());
            json_response(StatusCode::CREATED, city.to_string())
        }
        (Method::DELETE, ["cities", id]) => {
            cities.retain(|city| id_text(&city["id"]) != *id);
            json_response(StatusCode::OK, "{}".to_string())
        }
        _ => json_response(StatusCode::NOT_FOUND, "{}".to_string()),
    }
}
