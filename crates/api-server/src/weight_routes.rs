//! Weight Configuration API Routes
//!
//! Endpoints for reading and mutating the active weight vector and method
//! selection: manual edits, presets, auto-distribution, and toggles.

use analysis_core::Method;
use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use summary_engine::{Preset, WeightConfig};

use crate::{ApiResponse, AppError, AppState};

#[derive(Deserialize)]
pub struct SetWeightRequest {
    pub value: f64,
}

pub fn weight_routes() -> Router<AppState> {
    Router::new()
        .route("/api/weights", get(get_weights))
        .route("/api/weights/:method", put(set_weight))
        .route("/api/weights/preset/:name", post(apply_preset))
        .route("/api/weights/auto-distribute", post(auto_distribute))
        .route("/api/methods/:method/toggle", post(toggle_method))
}

async fn get_weights(State(state): State<AppState>) -> Json<ApiResponse<WeightConfig>> {
    let config = state.weights.read().await.config();
    Json(ApiResponse::success(config))
}

async fn set_weight(
    State(state): State<AppState>,
    Path(method): Path<String>,
    Json(request): Json<SetWeightRequest>,
) -> Result<Json<ApiResponse<WeightConfig>>, AppError> {
    let method: Method = method.parse().map_err(AppError::BadRequest)?;

    let mut manager = state.weights.write().await;
    manager.set_weight(method, request.value);
    Ok(Json(ApiResponse::success(manager.config())))
}

async fn apply_preset(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<WeightConfig>>, AppError> {
    let preset: Preset = name.parse().map_err(AppError::BadRequest)?;

    let mut manager = state.weights.write().await;
    manager.apply_preset(preset);
    Ok(Json(ApiResponse::success(manager.config())))
}

async fn auto_distribute(State(state): State<AppState>) -> Json<ApiResponse<WeightConfig>> {
    let mut manager = state.weights.write().await;
    manager.auto_distribute();
    Json(ApiResponse::success(manager.config()))
}

async fn toggle_method(
    State(state): State<AppState>,
    Path(method): Path<String>,
) -> Result<Json<ApiResponse<WeightConfig>>, AppError> {
    let method: Method = method.parse().map_err(AppError::BadRequest)?;

    let mut manager = state.weights.write().await;
    manager.toggle_method(method);
    Ok(Json(ApiResponse::success(manager.config())))
}
