pub mod coordinator;
pub mod repository;
pub mod seed;

pub use coordinator::{BookingCoordinator, BookingPolicy, BookingRequest};
pub use repository::{BookingRepository, ClaimOutcome, FlightRepository, StoreError, StoreResult};

use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Invalid payment details")]
    InvalidPayment,
    #[error("Invalid flight ID: {0}")]
    InvalidFlightId(String),
    #[error("A user is required to book a seat")]
    InvalidUser,
    #[error(
        "Seat {seat} is out of range{}",
        .capacity.map(|c| format!(" (1-{c})")).unwrap_or_default()
    )]
    SeatOutOfRange { seat: i64, capacity: Option<u32> },
    #[error("Flight not found: {0}")]
    FlightNotFound(Uuid),
    #[error("Seat {seat} already booked")]
    SeatAlreadyBooked { seat: u32 },
    #[error("Booking could not be saved: {0}")]
    PersistFailed(String),
    #[error("Storage unavailable: {0}")]
    StoreUnavailable(String),
}

impl BookingError {
    /// Stable machine-readable name reported alongside the message.
    pub fn category(&self) -> &'static str {
        match self {
            BookingError::InvalidPayment => "InvalidPayment",
            BookingError::InvalidFlightId(_) => "InvalidFlightId",
            BookingError::InvalidUser => "InvalidUser",
            BookingError::SeatOutOfRange { .. } => "SeatOutOfRange",
            BookingError::FlightNotFound(_) => "FlightNotFound",
            BookingError::SeatAlreadyBooked { .. } => "SeatAlreadyBooked",
            BookingError::PersistFailed(_) => "PersistFailed",
            BookingError::StoreUnavailable(_) => "StoreUnavailable",
        }
    }

    /// Errors raised from the request alone, before storage is consulted.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            BookingError::InvalidPayment
                | BookingError::InvalidFlightId(_)
                | BookingError::InvalidUser
                | BookingError::SeatOutOfRange { .. }
        )
    }
}

impl From<StoreError> for BookingError {
    fn from(err: StoreError) -> Self {
        BookingError::StoreUnavailable(err.to_string())
    }
}

pub type BookingResult<T> = Result<T, BookingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_and_categories() {
        let err = BookingError::SeatAlreadyBooked { seat: 12 };
        assert_eq!(err.to_string(), "Seat 12 already booked");
        assert_eq!(err.category(), "SeatAlreadyBooked");
        assert!(!err.is_validation());

        let err = BookingError::SeatOutOfRange { seat: 61, capacity: Some(60) };
        assert_eq!(err.to_string(), "Seat 61 is out of range (1-60)");
        assert!(err.is_validation());

        let err = BookingError::SeatOutOfRange { seat: -1, capacity: None };
        assert_eq!(err.to_string(), "Seat -1 is out of range");

        let err: BookingError = StoreError::Unavailable("pool timed out".into()).into();
        assert_eq!(err.category(), "StoreUnavailable");
    }
}
