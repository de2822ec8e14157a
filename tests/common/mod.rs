#![allow(dead_code)]

use axum::{
    Form, Json, Router,
    extract::{Path, Query, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use dataplat_client::middleware::auth::bearer_token;
use dataplat_client::{ApiClient, ClientEvent, Config, EventNotifier, Session};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use url::Url;
use uuid::Uuid;

pub const DEV_USER: &str = "dev@example.com";
pub const DEV_PASSWORD: &str = "123456";

#[derive(Debug, Clone)]
struct StoredConnection {
    record: Value,
    password: String,
}

#[derive(Default)]
struct BackendState {
    users: HashMap<String, (String, Value)>,
    tokens: HashSet<String>,
    connections: Vec<StoredConnection>,
}

/// In-process stand-in for the REST backend, served over real HTTP.
#[derive(Clone)]
pub struct FakeBackend {
    state: Arc<Mutex<BackendState>>,
    requests: Arc<AtomicUsize>,
    pub base_url: Url,
}

impl FakeBackend {
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind fake backend");
        let addr = listener.local_addr().expect("no local addr");

        let mut state = BackendState::default();
        state.users.insert(
            DEV_USER.to_string(),
            (
                DEV_PASSWORD.to_string(),
                json!({
                    "id": Uuid::new_v4(),
                    "username": DEV_USER,
                    "email": DEV_USER,
                    "full_name": "Dev User",
                    "is_active": true,
                    "created_at": "2025-08-29T10:15:00.123456",
                    "updated_at": "2025-08-29T10:15:00.123456"
                }),
            ),
        );

        let backend = Self {
            state: Arc::new(Mutex::new(state)),
            requests: Arc::new(AtomicUsize::new(0)),
            base_url: Url::parse(&format!("http://{addr}")).expect("bad fake backend url"),
        };

        let app = router(backend.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });
        backend
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Invalidate every issued token, as an expiry would.
    pub fn expire_tokens(&self) {
        self.state.lock().unwrap().tokens.clear();
    }

    pub fn stored_password(&self, id: Uuid) -> Option<String> {
        let id = id.to_string();
        self.state
            .lock()
            .unwrap()
            .connections
            .iter()
            .find(|c| c.record["id"] == id)
            .map(|c| c.password.clone())
    }

    pub fn client(&self, session: Session) -> (ApiClient, broadcast::Receiver<ClientEvent>) {
        client_for(self.base_url.clone(), session)
    }
}

pub fn client_for(
    base_url: Url,
    session: Session,
) -> (ApiClient, broadcast::Receiver<ClientEvent>) {
    let config = Config {
        backend_url: base_url,
        request_timeout_ms: 2000,
        ..Config::default()
    };
    let (notifier, rx) = EventNotifier::channel(64);
    let client = ApiClient::new(&config, session, Arc::new(notifier)).expect("client");
    (client, rx)
}

pub fn drain(rx: &mut broadcast::Receiver<ClientEvent>) -> Vec<ClientEvent> {
    let mut events = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        events.push(ev);
    }
    events
}

fn router(backend: FakeBackend) -> Router {
    Router::new()
        .route("/auth/front_token", post(login))
        .route("/auth/me", get(me))
        .route("/resources/connectors/test/", post(test_connection))
        .route(
            "/resources/connectors/",
            get(list_connections).post(create_connection),
        )
        .route(
            "/resources/connectors/{id}",
            get(read_connection)
                .put(update_connection)
                .delete(delete_connection),
        )
        .layer(middleware::from_fn_with_state(backend.clone(), count_requests))
        .with_state(backend)
}

async fn count_requests(State(backend): State<FakeBackend>, req: Request, next: Next) -> Response {
    backend.requests.fetch_add(1, Ordering::SeqCst);
    next.run(req).await
}

fn ok<T: Serialize>(data: T) -> Response {
    Json(json!({"code": 200, "message": "success", "data": data})).into_response()
}

fn fail(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({"detail": detail}))).into_response()
}

fn authorized(backend: &FakeBackend, headers: &HeaderMap) -> Result<(), Response> {
    let state = backend.state.lock().unwrap();
    match bearer_token(headers) {
        Some(token) if state.tokens.contains(token) => Ok(()),
        Some(_) => Err(fail(
            StatusCode::UNAUTHORIZED,
            "Could not validate credentials",
        )),
        None => Err(fail(StatusCode::UNAUTHORIZED, "Not authenticated")),
    }
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login(State(backend): State<FakeBackend>, Form(form): Form<LoginForm>) -> Response {
    let mut state = backend.state.lock().unwrap();
    let valid = state
        .users
        .get(&form.username)
        .is_some_and(|(pw, _)| *pw == form.password);
    if !valid {
        return fail(StatusCode::UNAUTHORIZED, "Incorrect username or password");
    }
    let token = format!("tok-{}", Uuid::new_v4());
    state.tokens.insert(token.clone());
    ok(json!({"access_token": token, "token_type": "bearer"}))
}

async fn me(State(backend): State<FakeBackend>, headers: HeaderMap) -> Response {
    if let Err(resp) = authorized(&backend, &headers) {
        return resp;
    }
    let state = backend.state.lock().unwrap();
    match state.users.get(DEV_USER) {
        Some((_, user)) => ok(user.clone()),
        None => fail(StatusCode::NOT_FOUND, "User not found"),
    }
}

async fn test_connection(Json(body): Json<Value>) -> Response {
    if body.get("id").is_some() {
        return fail(StatusCode::UNPROCESSABLE_ENTITY, "unexpected id");
    }
    if body["host"] == "unreachable" {
        ok(json!({"success": false, "error": "could not connect to server"}))
    } else {
        ok(json!({"success": true, "message": "OK"}))
    }
}

const CONNECTION_FIELDS: [&str; 6] = ["name", "db_type", "host", "port", "database", "username"];

async fn create_connection(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(resp) = authorized(&backend, &headers) {
        return resp;
    }
    let Some(password) = body.get("password").and_then(Value::as_str) else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": [
                {"loc": ["body", "password"], "msg": "field required", "type": "value_error.missing"}
            ]})),
        )
            .into_response();
    };

    let mut record = serde_json::Map::new();
    record.insert("id".into(), json!(Uuid::new_v4()));
    for field in CONNECTION_FIELDS {
        record.insert(field.into(), body.get(field).cloned().unwrap_or(Value::Null));
    }
    let record = Value::Object(record);

    let mut state = backend.state.lock().unwrap();
    if state
        .connections
        .iter()
        .any(|c| c.record["name"] == record["name"])
    {
        return fail(StatusCode::BAD_REQUEST, "Connection name already exists");
    }
    state.connections.push(StoredConnection {
        record: record.clone(),
        password: password.to_string(),
    });
    (
        StatusCode::CREATED,
        Json(json!({"code": 200, "message": "success", "data": record})),
    )
        .into_response()
}

#[derive(Deserialize)]
struct ListParams {
    skip: Option<usize>,
    limit: Option<usize>,
}

async fn list_connections(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Response {
    if let Err(resp) = authorized(&backend, &headers) {
        return resp;
    }
    let state = backend.state.lock().unwrap();
    let items: Vec<Value> = state
        .connections
        .iter()
        .skip(params.skip.unwrap_or(0))
        .take(params.limit.unwrap_or(100))
        .map(|c| c.record.clone())
        .collect();
    ok(items)
}

async fn read_connection(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Response {
    if let Err(resp) = authorized(&backend, &headers) {
        return resp;
    }
    let id = id.to_string();
    let state = backend.state.lock().unwrap();
    match state.connections.iter().find(|c| c.record["id"] == id) {
        Some(c) => ok(c.record.clone()),
        None => fail(StatusCode::NOT_FOUND, "Data connection not found"),
    }
}

async fn update_connection(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(resp) = authorized(&backend, &headers) {
        return resp;
    }
    let id = id.to_string();
    let mut state = backend.state.lock().unwrap();
    let Some(stored) = state.connections.iter_mut().find(|c| c.record["id"] == id) else {
        return fail(StatusCode::NOT_FOUND, "Data connection not found");
    };
    for field in CONNECTION_FIELDS {
        if let Some(v) = body.get(field) {
            stored.record[field] = v.clone();
        }
    }
    // A present password always overwrites, even when empty.
    if let Some(pw) = body.get("password").and_then(Value::as_str) {
        stored.password = pw.to_string();
    }
    ok(stored.record.clone())
}

async fn delete_connection(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Response {
    if let Err(resp) = authorized(&backend, &headers) {
        return resp;
    }
    let id = id.to_string();
    let mut state = backend.state.lock().unwrap();
    let before = state.connections.len();
    state.connections.retain(|c| c.record["id"] != id);
    if state.connections.len() == before {
        return fail(StatusCode::NOT_FOUND, "Data connection not found");
    }
    ok(json!({"message": "Data connection deleted successfully"}))
}
