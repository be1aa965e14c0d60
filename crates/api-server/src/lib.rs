//! HTTP surface for the dashboard frontend.
//!
//! The server owns one shared `WeightManager` (the active weight/selection
//! configuration) and one `DashboardOrchestrator`. Every analysis request is
//! recomputed from the current configuration; there is no persisted
//! recommendation state.

use analysis_orchestrator::DashboardOrchestrator;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use market_data::MarketDataClient;
use serde::Serialize;
use std::sync::Arc;
use summary_engine::WeightManager;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

pub mod analyze_routes;
pub mod weight_routes;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<DashboardOrchestrator>,
    pub weights: Arc<RwLock<WeightManager>>,
}

/// Standard response envelope
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

pub enum AppError {
    BadRequest(String),
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(e: E) -> Self {
        AppError::Internal(e.into())
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(analyze_routes::analyze_routes())
        .merge(weight_routes::weight_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::success("ok"))
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let api_key = std::env::var("MARKET_DATA_API_KEY")
        .map_err(|_| anyhow::anyhow!("MARKET_DATA_API_KEY must be set"))?;

    let provider = Arc::new(MarketDataClient::new(api_key));
    let state = AppState {
        orchestrator: Arc::new(DashboardOrchestrator::new(provider)),
        weights: Arc::new(RwLock::new(WeightManager::new())),
    };

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8080);
    let addr = format!("0.0.0.0:{}", port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("API server listening on {}", addr);
    axum::serve(listener, build_router(state)).await?;

    Ok(())
}
