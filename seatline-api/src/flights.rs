use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use seatline_shared::Flight;
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightResponse {
    #[serde(flatten)]
    pub flight: Flight,
    pub available_seats: u32,
}

impl From<Flight> for FlightResponse {
    fn from(flight: Flight) -> Self {
        let available_seats = flight.available_seats();
        Self { flight, available_seats }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/flights", get(list_flights))
        .route("/flights/{id}", get(get_flight))
}

async fn list_flights(State(state): State<AppState>) -> Result<Json<Vec<FlightResponse>>, AppError> {
    let flights = state.coordinator.flights().await?;
    Ok(Json(flights.into_iter().map(FlightResponse::from).collect()))
}

async fn get_flight(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FlightResponse>, AppError> {
    let flight = state.coordinator.flight(&id).await?;
    Ok(Json(flight.into()))
}
