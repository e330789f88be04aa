//! In-process fake of the marketplace API for integration tests: auth and
//! refresh endpoints, an order listing that records bearer tokens, chat
//! history/durable-write routes, and the chat WebSocket.

// Not every test binary exercises every helper here.
#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU32, Ordering};
use std::sync::Mutex;

use axum::Json;
use axum::extract::ws::{Message as AxumWsMessage, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::{Value, json};

/// Mutable behavior and observation points for the fake server.
pub struct ServerState {
    /// Access token the protected routes accept.
    pub valid_access: Mutex<String>,
    /// Refresh token the refresh endpoint accepts.
    pub valid_refresh: Mutex<String>,
    /// Access token the refresh endpoint hands out.
    pub refreshed_access: Mutex<String>,
    /// Number of times the refresh endpoint was hit.
    pub refresh_calls: AtomicU32,
    /// Bearer tokens seen on `GET /orders/`, in arrival order.
    pub order_tokens: Mutex<Vec<Option<String>>>,
    /// Durable chat log: (message id, sender id, content).
    pub chat_log: Mutex<Vec<(i64, i64, String)>>,
    next_message_id: AtomicI64,
    /// Whether the WebSocket route accepts upgrades.
    pub ws_enabled: AtomicBool,
    /// Raw JSON frames pushed to the client right after the socket opens.
    pub ws_greetings: Mutex<Vec<String>>,
    /// Text frames received from the client on the socket.
    pub ws_received: Mutex<Vec<String>>,
}

impl Default for ServerState {
    fn default() -> Self {
        Self {
            valid_access: Mutex::new("A1".into()),
            valid_refresh: Mutex::new("R1".into()),
            refreshed_access: Mutex::new("A1".into()),
            refresh_calls: AtomicU32::new(0),
            order_tokens: Mutex::new(Vec::new()),
            chat_log: Mutex::new(Vec::new()),
            next_message_id: AtomicI64::new(1),
            ws_enabled: AtomicBool::new(true),
            ws_greetings: Mutex::new(Vec::new()),
            ws_received: Mutex::new(Vec::new()),
        }
    }
}

impl ServerState {
    pub fn seed_history(&self, sender: i64, content: &str) -> i64 {
        let id = self.next_message_id.fetch_add(1, Ordering::SeqCst);
        self.chat_log.lock().unwrap().push((id, sender, content.into()));
        id
    }
}

/// Bind the fake API on an ephemeral port; returns the REST base URL
/// (`http://127.0.0.1:<port>/api`).
pub async fn spawn(state: Arc<ServerState>) -> String {
    let app = Router::new()
        .route("/api/login/", post(login))
        .route("/api/register/", post(register))
        .route("/api/token/refresh/", post(refresh))
        .route("/api/orders/", get(list_orders).post(create_order))
        .route("/api/chat/conversations/", get(conversations))
        .route("/api/chat/conversations/order/{order_id}/", get(history))
        .route("/api/chat/orders/{order_id}/start-chat/", post(start_chat))
        .route("/ws/chat/{order_id}/", get(ws_upgrade))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api")
}

pub fn alice() -> Value {
    json!({"id": 1, "username": "alice", "email": "alice@example.com", "role": "buyer"})
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(ToString::to_string)
}

fn order_json() -> Value {
    json!({
        "id": 1, "buyer": 1, "buyer_username": "alice",
        "product": 8, "product_name": "Mug", "shop_name": "Tech",
        "quantity": 1, "total_price": "10.00", "status": "pending",
        "buyer_phone": "", "buyer_message": "", "created_at": null
    })
}

fn conversation_json(state: &ServerState, order_id: i64) -> Value {
    let messages: Vec<Value> = state
        .chat_log
        .lock()
        .unwrap()
        .iter()
        .map(|(id, sender, content)| {
            json!({
                "id": id,
                "sender": {"id": sender, "username": format!("user{sender}"), "role": "buyer"},
                "content": content,
                "timestamp": "2024-05-01T10:00:00Z",
                "is_read": false
            })
        })
        .collect();
    json!({
        "id": order_id,
        "order_id": order_id,
        "participants": [
            alice(),
            {"id": 2, "username": "bob", "role": "seller"}
        ],
        "messages": messages,
        "created_at": "2024-05-01T09:00:00Z",
        "updated_at": "2024-05-01T10:00:00Z"
    })
}

async fn login(State(state): State<Arc<ServerState>>, Json(body): Json<Value>) -> Response {
    if body["password"] == "pw" {
        let access = state.valid_access.lock().unwrap().clone();
        let refresh = state.valid_refresh.lock().unwrap().clone();
        Json(json!({"user": alice(), "access": access, "refresh": refresh})).into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"non_field_errors": ["Invalid credentials"]})),
        )
            .into_response()
    }
}

async fn register(State(state): State<Arc<ServerState>>, Json(body): Json<Value>) -> Response {
    if body["username"] == "taken" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"username": ["A user with that username already exists."]})),
        )
            .into_response();
    }
    let access = state.valid_access.lock().unwrap().clone();
    let refresh = state.valid_refresh.lock().unwrap().clone();
    let user = json!({
        "id": 2,
        "username": body["username"],
        "email": body["email"],
        "role": body["role"]
    });
    Json(json!({"user": user, "access": access, "refresh": refresh})).into_response()
}

async fn refresh(State(state): State<Arc<ServerState>>, Json(body): Json<Value>) -> Response {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    let expected = state.valid_refresh.lock().unwrap().clone();
    if body["refresh"] == expected.as_str() {
        let access = state.refreshed_access.lock().unwrap().clone();
        Json(json!({"access": access})).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Token is invalid or expired"})),
        )
            .into_response()
    }
}

async fn list_orders(State(state): State<Arc<ServerState>>, headers: HeaderMap) -> Response {
    let token = bearer(&headers);
    state.order_tokens.lock().unwrap().push(token.clone());
    let expected = state.valid_access.lock().unwrap().clone();
    if token.as_deref() == Some(expected.as_str()) {
        Json(json!([order_json()])).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Given token not valid for any token type"})),
        )
            .into_response()
    }
}

async fn create_order(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let expected = state.valid_access.lock().unwrap().clone();
    if bearer(&headers).as_deref() != Some(expected.as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Given token not valid for any token type"})),
        )
            .into_response();
    }
    if body["quantity"] == 0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"quantity": ["Quantity must be greater than 0"]})),
        )
            .into_response();
    }
    (StatusCode::CREATED, Json(order_json())).into_response()
}

async fn conversations(State(state): State<Arc<ServerState>>) -> Response {
    Json(json!([conversation_json(&state, 1)])).into_response()
}

async fn history(
    State(state): State<Arc<ServerState>>,
    Path(order_id): Path<i64>,
) -> Response {
    Json(conversation_json(&state, order_id)).into_response()
}

async fn start_chat(
    State(state): State<Arc<ServerState>>,
    Path(order_id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if let Some(content) = body["content"].as_str() {
        let id = state.next_message_id.fetch_add(1, Ordering::SeqCst);
        state.chat_log.lock().unwrap().push((id, 1, content.into()));
    }
    (
        StatusCode::CREATED,
        Json(conversation_json(&state, order_id)),
    )
        .into_response()
}

async fn ws_upgrade(
    State(state): State<Arc<ServerState>>,
    Path(_order_id): Path<i64>,
    ws: WebSocketUpgrade,
) -> Response {
    if !state.ws_enabled.load(Ordering::SeqCst) {
        return StatusCode::NOT_FOUND.into_response();
    }
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<ServerState>) {
    let greetings: Vec<String> = state.ws_greetings.lock().unwrap().drain(..).collect();
    for frame in greetings {
        if socket.send(AxumWsMessage::Text(frame.into())).await.is_err() {
            return;
        }
    }
    while let Some(Ok(message)) = socket.recv().await {
        match message {
            AxumWsMessage::Text(text) => {
                state.ws_received.lock().unwrap().push(text.to_string());
            }
            AxumWsMessage::Close(_) => break,
            _ => {}
        }
    }
}
