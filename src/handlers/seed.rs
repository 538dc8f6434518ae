use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::SeedError;
use crate::handlers::AppState;
use crate::seed::SEED_SUCCESS_MESSAGE;

#[derive(Debug, Serialize, Deserialize)]
pub struct SeedResponse {
    pub message: String,
}

/// GET /seed - populate the dashboard tables with the placeholder data.
///
/// Safe to call repeatedly; rows that already exist are skipped.
pub async fn seed_database(State(state): State<AppState>) -> Result<Json<SeedResponse>, SeedError> {
    info!("Seed requested");

    let report = state.seeder.run(state.config.postgres_url()).await?;
    info!(inserted = report.total(), "Seed request completed");

    Ok(Json(SeedResponse {
        message: SEED_SUCCESS_MESSAGE.to_string(),
    }))
}

pub fn seed_routes() -> Router<AppState> {
    Router::new().route("/seed", get(seed_database))
}
