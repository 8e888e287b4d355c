//! Test utilities for lungnan-core
//!
//! A mock LINE Messaging API server for client tests, and an in-process
//! `ReplySender` that records replies for webhook tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio::sync::oneshot;

use crate::error::{Error, Result};
use crate::line::ReplySender;

/// A reply captured by the mock server
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedReply {
    pub reply_token: String,
    pub text: String,
    pub authorization: String,
}

#[derive(Default)]
struct MockState {
    replies: Vec<RecordedReply>,
    /// (id, name) in creation order
    rich_menus: Vec<(String, String)>,
    images: HashMap<String, Vec<u8>>,
    default_menu: Option<String>,
    next_id: u64,
}

type SharedState = Arc<Mutex<MockState>>;

/// Mock LINE API server for testing
pub struct MockLineServer {
    addr: SocketAddr,
    state: SharedState,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockLineServer {
    /// Reply token the mock answers with 400, like an expired token
    pub const REJECTED_TOKEN: &'static str = "expired-reply-token";

    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let state = SharedState::default();

        let app = Router::new()
            .route("/v2/bot/message/reply", post(handle_reply))
            .route("/v2/bot/richmenu", post(handle_create_menu))
            .route(
                "/v2/bot/richmenu/:id",
                get(handle_list_menus).delete(handle_delete_menu),
            )
            .route("/v2/bot/richmenu/:id/content", post(handle_upload_image))
            .route("/v2/bot/user/all/richmenu/:id", post(handle_set_default))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Replies received so far, oldest first
    pub fn replies(&self) -> Vec<RecordedReply> {
        self.state.lock().unwrap().replies.clone()
    }

    /// Seed a rich menu as if it had been created earlier
    pub fn add_rich_menu(&self, id: &str, name: &str) {
        self.state
            .lock()
            .unwrap()
            .rich_menus
            .push((id.to_string(), name.to_string()));
    }

    pub fn default_rich_menu(&self) -> Option<String> {
        self.state.lock().unwrap().default_menu.clone()
    }

    pub fn uploaded_image(&self, id: &str) -> Option<Vec<u8>> {
        self.state.lock().unwrap().images.get(id).cloned()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockLineServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

async fn handle_reply(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let reply_token = body["replyToken"].as_str().unwrap_or_default().to_string();
    if reply_token == MockLineServer::REJECTED_TOKEN {
        return error_body(StatusCode::BAD_REQUEST, "Invalid reply token");
    }

    let text = body["messages"][0]["text"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    state.lock().unwrap().replies.push(RecordedReply {
        reply_token,
        text,
        authorization,
    });
    Json(json!({})).into_response()
}

/// `GET /v2/bot/richmenu/list` shares its path shape with the per-menu routes
async fn handle_list_menus(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    if id != "list" {
        return error_body(StatusCode::NOT_FOUND, "Not found");
    }
    let state = state.lock().unwrap();
    let menus: Vec<_> = state
        .rich_menus
        .iter()
        .map(|(id, name)| json!({ "richMenuId": id, "name": name }))
        .collect();
    Json(json!({ "richmenus": menus })).into_response()
}

async fn handle_delete_menu(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let mut state = state.lock().unwrap();
    let before = state.rich_menus.len();
    state.rich_menus.retain(|(menu_id, _)| *menu_id != id);
    if state.rich_menus.len() == before {
        return error_body(StatusCode::NOT_FOUND, "Rich menu not found");
    }
    state.images.remove(&id);
    Json(json!({})).into_response()
}

async fn handle_create_menu(
    State(state): State<SharedState>,
    Json(menu): Json<serde_json::Value>,
) -> Response {
    let Some(name) = menu["name"].as_str() else {
        return error_body(StatusCode::BAD_REQUEST, "name is required");
    };
    let mut state = state.lock().unwrap();
    state.next_id += 1;
    let id = format!("richmenu-{}", state.next_id);
    state.rich_menus.push((id.clone(), name.to_string()));
    Json(json!({ "richMenuId": id })).into_response()
}

async fn handle_upload_image(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Response {
    let mut state = state.lock().unwrap();
    if !state.rich_menus.iter().any(|(menu_id, _)| *menu_id == id) {
        return error_body(StatusCode::NOT_FOUND, "Rich menu not found");
    }
    state.images.insert(id, body.to_vec());
    Json(json!({})).into_response()
}

async fn handle_set_default(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let mut state = state.lock().unwrap();
    if !state.rich_menus.iter().any(|(menu_id, _)| *menu_id == id) {
        return error_body(StatusCode::NOT_FOUND, "Rich menu not found");
    }
    state.default_menu = Some(id);
    Json(json!({})).into_response()
}

/// `ReplySender` that keeps replies in memory instead of calling LINE
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sender whose every delivery fails
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// (reply token, text) pairs, oldest first
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplySender for RecordingSender {
    async fn reply(&self, reply_token: &str, text: &str) -> Result<()> {
        if self.fail {
            return Err(Error::Line("delivery disabled in test".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((reply_token.to_string(), text.to_string()));
        Ok(())
    }
}
