#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::{Value, json};

pub const VALID_TOKEN: &str = "abc";
pub const PASSWORD: &str = "secret";

/// In-process stand-in for the expense service.
#[derive(Clone, Default)]
pub struct MockService {
    pub expenses: Arc<Mutex<Vec<Value>>>,
    pub seen_auth: Arc<Mutex<Vec<Option<String>>>>,
    next_id: Arc<AtomicUsize>,
    envelope: bool,
}

impl MockService {
    pub fn last_auth(&self) -> Option<String> {
        self.seen_auth.lock().unwrap().last().cloned().flatten()
    }

    fn wrap(&self, value: Value) -> Value {
        if self.envelope {
            json!({ "success": true, "data": value })
        } else {
            value
        }
    }
}

/// Starts the mock on an ephemeral port and returns its base URL.
///
/// With `envelope` set, list and single-record responses are wrapped under
/// `data`.
pub async fn spawn_mock(envelope: bool) -> (String, MockService) {
    let service = MockService {
        envelope,
        ..Default::default()
    };

    let expenses = Router::new()
        .route("/api/expenses", get(list).post(create))
        .route("/api/expenses/{id}", put(update).delete(remove))
        .route_layer(middleware::from_fn(require_token));

    let app = expenses
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/me", get(me))
        .route("/api/auth/logout", post(logout))
        .layer(middleware::from_fn_with_state(service.clone(), record_auth))
        .with_state(service.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), service)
}

fn authorization(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn is_valid(headers: &HeaderMap) -> bool {
    authorization(headers).as_deref() == Some(format!("Bearer {VALID_TOKEN}").as_str())
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Token expired" })),
    )
        .into_response()
}

async fn record_auth(State(service): State<MockService>, request: Request, next: Next) -> Response {
    service
        .seen_auth
        .lock()
        .unwrap()
        .push(authorization(request.headers()));
    next.run(request).await
}

async fn require_token(request: Request, next: Next) -> Response {
    if !is_valid(request.headers()) {
        return unauthorized();
    }
    next.run(request).await
}

async fn list(State(service): State<MockService>) -> Json<Value> {
    let items = Value::Array(service.expenses.lock().unwrap().clone());
    Json(service.wrap(items))
}

async fn create(
    State(service): State<MockService>,
    Json(mut body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let id = service.next_id.fetch_add(1, Ordering::SeqCst) + 1;
    body["_id"] = json!(format!("exp-{id}"));
    service.expenses.lock().unwrap().push(body.clone());
    (StatusCode::CREATED, Json(service.wrap(body)))
}

async fn update(
    State(service): State<MockService>,
    Path(id): Path<String>,
    Json(changes): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut expenses = service.expenses.lock().unwrap();
    let Some(record) = expenses.iter_mut().find(|record| record["_id"] == json!(id)) else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Expense not found" })),
        ));
    };
    if let (Some(record), Some(changes)) = (record.as_object_mut(), changes.as_object()) {
        for (key, value) in changes {
            record.insert(key.clone(), value.clone());
        }
    }
    Ok(Json(service.wrap(record.clone())))
}

async fn remove(
    State(service): State<MockService>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut expenses = service.expenses.lock().unwrap();
    let before = expenses.len();
    expenses.retain(|record| record["_id"] != json!(id));
    if expenses.len() == before {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Expense not found" })),
        ));
    }
    Ok(Json(json!({ "success": true })))
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == json!(PASSWORD) {
        return Json(json!({ "token": VALID_TOKEN })).into_response();
    }
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Invalid credentials" })),
    )
        .into_response()
}

async fn register(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "token": VALID_TOKEN,
        "user": { "_id": "u1", "name": body["name"], "email": body["email"] }
    }))
}

async fn me(headers: HeaderMap) -> Response {
    if !is_valid(&headers) {
        return unauthorized();
    }
    Json(json!({
        "success": true,
        "user": { "id": "u1", "name": "Govind", "email": "govind@gmail.com" }
    }))
    .into_response()
}

async fn logout() -> Json<Value> {
    Json(json!({ "success": true }))
}
