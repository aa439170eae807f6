use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::stats::StatsSnapshot;
use crate::state::AppState;

/// GET /api/stats
pub async fn handle_stats(State(state): State<AppState>) -> Result<Json<StatsSnapshot>, AppError> {
    let snapshot = state.stats.snapshot().await?;
    Ok(Json(snapshot))
}
