use async_trait::async_trait;
use seatline_shared::{Booking, Flight, NewFlight};
use uuid::Uuid;

/// Infrastructure failures. Domain outcomes of a claim are reported through
/// [`ClaimOutcome`] instead.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Result of an atomic seat claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    Claimed,
    SeatTaken,
    OutOfRange { capacity: u32 },
    FlightNotFound,
}

/// Authoritative flight capacity and seat occupancy.
#[async_trait]
pub trait FlightRepository: Send + Sync {
    async fn get_flight(&self, id: Uuid) -> StoreResult<Option<Flight>>;

    async fn list_flights(&self) -> StoreResult<Vec<Flight>>;

    async fn count_flights(&self) -> StoreResult<usize>;

    /// Add `seat_number` to the flight's booked seats if, and only if, it is
    /// within capacity and not already present. Implementations must make the
    /// check and the insert a single atomic step with respect to every other
    /// claim on the same flight.
    async fn claim_seat(&self, id: Uuid, seat_number: u32) -> StoreResult<ClaimOutcome>;

    /// Undo a claim whose booking record could not be written. A seat that is
    /// referenced by a booking is left in place.
    async fn release_seat(&self, id: Uuid, seat_number: u32) -> StoreResult<()>;

    /// Replace every flight (and every booking) with `records`.
    async fn seed_flights(&self, records: Vec<NewFlight>) -> StoreResult<Vec<Flight>>;
}

/// Append-only booking records.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Idempotent on `booking.id`, so a write whose outcome was unknown can be
    /// retried safely.
    async fn insert_booking(&self, booking: &Booking) -> StoreResult<()>;

    /// Whether a booking with this id has been written. Resolves writes whose
    /// outcome the caller never saw.
    async fn booking_exists(&self, id: Uuid) -> StoreResult<bool>;

    async fn list_bookings(&self) -> StoreResult<Vec<Booking>>;
}
