use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub message: String,
    pub flights: usize,
}

pub fn routes() -> Router<AppState> {
    // GET kept alongside POST for existing clients.
    Router::new().route("/seed", get(seed_flights).post(seed_flights))
}

/// Replace every flight (and booking) with the starter schedule.
async fn seed_flights(State(state): State<AppState>) -> Result<Json<SeedResponse>, AppError> {
    let flights = state.coordinator.seed().await?;

    Ok(Json(SeedResponse {
        message: "Flights seeded successfully".to_string(),
        flights: flights.len(),
    }))
}
