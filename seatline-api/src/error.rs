use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use seatline_core::BookingError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    Booking(BookingError),
    BadRequest(String),
}

impl AppError {
    fn parts(self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Booking(err) if err.is_validation() => {
                (StatusCode::BAD_REQUEST, err.category(), err.to_string())
            }
            AppError::Booking(err) => {
                let category = err.category();
                match err {
                    BookingError::FlightNotFound(_) => (StatusCode::NOT_FOUND, category, "Flight not found".to_string()),
                    BookingError::SeatAlreadyBooked { .. } => (StatusCode::CONFLICT, category, err.to_string()),
                    BookingError::PersistFailed(_) => {
                        tracing::error!("Booking persistence failed: {}", err);
                        (StatusCode::INTERNAL_SERVER_ERROR, category, "Error booking seat".to_string())
                    }
                    BookingError::StoreUnavailable(_) => {
                        tracing::error!("Storage unavailable: {}", err);
                        (StatusCode::SERVICE_UNAVAILABLE, category, "Service temporarily unavailable".to_string())
                    }
                    // Validation errors are handled above.
                    _ => (StatusCode::BAD_REQUEST, category, err.to_string()),
                }
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "InvalidRequest", msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, category, error_message) = self.parts();

        let body = Json(json!({
            "error": error_message,
            "category": category,
        }));

        (status, body).into_response()
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        Self::Booking(err)
    }
}
