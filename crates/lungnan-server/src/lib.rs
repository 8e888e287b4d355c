//! Lung Nan Web Server
//!
//! Axum server for the Lung Nan budget bot.
//!
//! - `POST /webhook` receives LINE events, verified by channel signature
//! - `GET /` is a plain-text liveness check
//! - `/api/*` is a small JSON API guarded by API keys
//!
//! Security features:
//! - HMAC-SHA256 webhook signature check (constant-time)
//! - Constant-time API key comparison
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use lungnan_core::db::Database;
use lungnan_core::line::ReplySender;

mod handlers;
pub mod signature;

pub use signature::{verify_signature, CHANNEL_SECRET_ENV, SIGNATURE_HEADER};

/// Environment variable with comma separated API keys
pub const API_KEYS_ENV: &str = "LUNGNAN_API_KEYS";

/// Authorization header for API key auth
const AUTHORIZATION_HEADER: &str = "authorization";

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Whether `/api` requires an API key (secure by default)
    pub require_auth: bool,
    /// Keys accepted as `Authorization: Bearer <key>`
    pub api_keys: Vec<String>,
    /// LINE channel secret; `None` disables webhook signature checks
    pub channel_secret: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            api_keys: vec![],
            channel_secret: None,
        }
    }
}

/// Parse a comma-separated API key list, dropping blanks
pub fn parse_api_keys(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect()
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
    /// Where webhook replies go
    pub sender: Arc<dyn ReplySender>,
}

/// Authentication middleware for `/api` - validates Bearer API keys
///
/// Keys are compared in constant time. The webhook route is not behind this
/// middleware; LINE authenticates with the body signature instead.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if !state.config.require_auth {
        return next.run(request).await;
    }

    let api_key_valid = request
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|key| validate_api_key(key, &state.config.api_keys))
        .unwrap_or(false);

    if api_key_valid {
        info!(user = "api-key", path = %request.uri().path(), "Authenticated via API key");
        return next.run(request).await;
    }

    warn!(path = %request.uri().path(), "Unauthorized request - no valid auth");
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": "Authentication required"
        })),
    )
        .into_response()
}

/// Validate an API key against the configured keys using constant-time comparison
fn validate_api_key(provided: &str, valid_keys: &[String]) -> bool {
    use subtle::ConstantTimeEq;

    let provided_bytes = provided.as_bytes();

    valid_keys.iter().any(|key| {
        let key_bytes = key.as_bytes();
        // Only compare if lengths match (constant-time for same-length keys)
        provided_bytes.len() == key_bytes.len() && bool::from(provided_bytes.ct_eq(key_bytes))
    })
}

/// Create the application router
pub fn create_router(db: Database, config: ServerConfig, sender: Arc<dyn ReplySender>) -> Router {
    let state = Arc::new(AppState { db, config, sender });

    let api_routes = Router::new()
        .route("/parse", post(handlers::parse_message))
        .route("/users/:user_id/summary", get(handlers::get_summary))
        .route("/users/:user_id/health", get(handlers::get_health))
        .route("/users/:user_id/categories", get(handlers::list_categories))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(handlers::status))
        .route("/webhook", post(handlers::line_webhook))
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start the server
pub async fn serve(
    db: Database,
    host: &str,
    port: u16,
    config: ServerConfig,
    sender: Arc<dyn ReplySender>,
) -> anyhow::Result<()> {
    if !config.require_auth {
        warn!("⚠️  API authentication disabled - do not expose to network!");
    }
    if config.channel_secret.is_none() {
        warn!("⚠️  Webhook signature check disabled - anyone can post events!");
    }

    let app = create_router(db, config, sender);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            internal: Some(err.into()),
        }
    }
}
