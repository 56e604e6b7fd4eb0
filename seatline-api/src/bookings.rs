use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use seatline_core::BookingRequest;
use seatline_shared::{Booking, BookingView};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AppError;
use crate::state::AppState;

/// Body of `POST /book`. Missing strings are treated as empty so they fail
/// the coordinator's validation with a typed error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSeatRequest {
    pub user: Option<String>,
    pub flight_id: Option<String>,
    pub seat_number: i64,
    #[serde(alias = "paymentCode")]
    pub payment_token: Option<String>,
}

impl From<BookSeatRequest> for BookingRequest {
    fn from(req: BookSeatRequest) -> Self {
        BookingRequest {
            user: req.user.unwrap_or_default(),
            flight_id: req.flight_id.unwrap_or_default(),
            seat_number: req.seat_number,
            payment_token: req.payment_token.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookingConfirmation {
    pub message: String,
    pub booking: Booking,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/book", post(book_seat))
        .route("/bookings", get(list_bookings))
}

async fn book_seat(
    State(state): State<AppState>,
    payload: Result<Json<BookSeatRequest>, JsonRejection>,
) -> Result<Json<BookingConfirmation>, AppError> {
    let Json(req) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    info!(
        "Received booking request: user={:?} flight={:?} seat={}",
        req.user, req.flight_id, req.seat_number
    );

    let booking = state.coordinator.book(req.into()).await?;

    Ok(Json(BookingConfirmation {
        message: "Booking successful!".to_string(),
        booking,
    }))
}

async fn list_bookings(State(state): State<AppState>) -> Result<Json<Vec<BookingView>>, AppError> {
    Ok(Json(state.coordinator.bookings().await?))
}
