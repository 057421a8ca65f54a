use axum::{extract::State, routing::post, Json, Router};
use tracing::{error, info, instrument};

use super::dto::{AnalyzeRequest, NutrientRecord};
use super::error::AnalyzeError;
use super::services;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/analyze_food", post(analyze_food))
}

#[instrument(skip(state, body))]
pub async fn analyze_food(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeRequest>,
) -> Result<Json<NutrientRecord>, AnalyzeError> {
    match services::analyze_food(&state, body).await {
        Ok(record) => {
            info!(nutrients = record.0.len(), "analysis complete");
            Ok(Json(record))
        }
        Err(e) => {
            error!(error = %e, "analysis failed");
            Err(e)
        }
    }
}
