//! HTTP API gateway for EcoWatt.
//!
//! Exposes the account, appliance and chatbot endpoints plus a health check.
//!
//! Built on Axum for high performance async HTTP.

pub mod accounts;
pub mod appliances;
pub mod chatbot;
pub mod error;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::{
    Router,
    response::Json,
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use ecowatt_assistant::EnergyAssistant;
use ecowatt_config::{AppConfig, GatewayConfig};
use ecowatt_core::store::EnergyStore;

pub use error::ApiError;

/// Shared application state for the gateway.
pub struct AppState {
    pub store: Arc<dyn EnergyStore>,
    pub assistant: Arc<EnergyAssistant>,
}

impl AppState {
    /// Build state whose assistant reads from the same store.
    pub fn new(store: Arc<dyn EnergyStore>, assistant: EnergyAssistant) -> Self {
        Self {
            store,
            assistant: Arc::new(assistant),
        }
    }
}

pub type SharedState = Arc<AppState>;

/// Build the Axum router with all gateway routes.
///
/// Layers applied:
/// - CORS (any origin unless origins are configured)
/// - Request body size limit (1 MB)
/// - HTTP trace logging
pub fn build_router(state: SharedState, gateway: &GatewayConfig) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/signup", post(accounts::signup_handler))
        .route("/login", post(accounts::login_handler))
        .route("/api/appliances", post(appliances::connect_handler))
        .route(
            "/api/appliances/{id}",
            get(appliances::list_handler).delete(appliances::delete_handler),
        )
        .route("/api/chatbot", post(chatbot::chatbot_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(cors_layer(&gateway.cors_origins))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    if origins.is_empty() {
        return base.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(parsed))
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let store = ecowatt_storage::connect(
        &config.storage.database_url,
        config.storage.max_connections,
    )
    .await?;
    let assistant = EnergyAssistant::from_config(store.clone(), &config.assistant);
    if !assistant.generative().has_credential() {
        warn!("No Hugging Face token configured; the chatbot will answer from rules only");
    }

    let state = Arc::new(AppState::new(store, assistant));
    let app = build_router(state, &config.gateway);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct RootResponse {
    message: &'static str,
}

async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: "EcoWatt API is running",
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
