//! Analysis API Routes
//!
//! Runs the multi-method analysis for a ticker using the server's current
//! weight configuration, optionally narrowed to an explicit methods subset.

use analysis_core::{DashboardAnalysis, Method};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::collections::BTreeSet;

use crate::{ApiResponse, AppError, AppState};

#[derive(Deserialize)]
pub struct AnalyzeQuery {
    /// Comma-separated method slugs, e.g. "buffett,lynch,quantitative".
    /// Omitted means "use the currently selected methods".
    #[serde(default)]
    pub methods: Option<String>,
}

pub fn analyze_routes() -> Router<AppState> {
    Router::new().route("/api/analyze/:symbol", get(analyze_symbol))
}

async fn analyze_symbol(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<AnalyzeQuery>,
) -> Result<Json<ApiResponse<DashboardAnalysis>>, AppError> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(AppError::BadRequest("Symbol must not be empty".to_string()));
    }

    let mut config = state.weights.read().await.config();

    if let Some(methods) = &query.methods {
        let mut requested = BTreeSet::new();
        for slug in methods.split(',').filter(|s| !s.trim().is_empty()) {
            let method: Method = slug
                .parse()
                .map_err(|e: String| AppError::BadRequest(e))?;
            requested.insert(method);
        }
        // Narrow the selection for this request; stored weights still apply.
        config.selected = requested;
    }

    let analysis = state.orchestrator.analyze(&symbol, &config).await;
    Ok(Json(ApiResponse::success(analysis)))
}
