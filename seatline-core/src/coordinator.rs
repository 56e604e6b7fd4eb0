use seatline_shared::{Booking, BookingConfirmedEvent, BookingView, Flight};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::repository::{BookingRepository, ClaimOutcome, FlightRepository};
use crate::seed::starter_flights;
use crate::{BookingError, BookingResult};

/// How hard the coordinator tries to write a booking record once its seat
/// has been claimed.
#[derive(Debug, Clone)]
pub struct BookingPolicy {
    pub persist_attempts: u32,
    pub retry_backoff: Duration,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            persist_attempts: 3,
            retry_backoff: Duration::from_millis(50),
        }
    }
}

/// A raw booking attempt as received from a client.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub user: String,
    pub flight_id: String,
    pub seat_number: i64,
    pub payment_token: String,
}

struct ValidatedRequest {
    user: String,
    flight_id: Uuid,
    seat_number: u32,
    payment_token: String,
}

impl BookingRequest {
    /// Checks that need nothing but the request itself.
    fn validate(self) -> BookingResult<ValidatedRequest> {
        if self.payment_token.trim().is_empty() {
            return Err(BookingError::InvalidPayment);
        }
        let flight_id = parse_flight_id(&self.flight_id)?;
        let seat_number = u32::try_from(self.seat_number)
            .ok()
            .filter(|seat| *seat >= 1)
            .ok_or(BookingError::SeatOutOfRange { seat: self.seat_number, capacity: None })?;
        let user = self.user.trim();
        if user.is_empty() {
            return Err(BookingError::InvalidUser);
        }

        Ok(ValidatedRequest {
            user: user.to_string(),
            flight_id,
            seat_number,
            payment_token: self.payment_token,
        })
    }
}

fn parse_flight_id(raw: &str) -> BookingResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| BookingError::InvalidFlightId(raw.to_string()))
}

/// Orchestrates booking attempts against the inventory and booking stores.
///
/// Cheap to clone; every clone shares the same stores.
#[derive(Clone)]
pub struct BookingCoordinator {
    flights: Arc<dyn FlightRepository>,
    bookings: Arc<dyn BookingRepository>,
    policy: BookingPolicy,
    events: Option<broadcast::Sender<BookingConfirmedEvent>>,
}

impl BookingCoordinator {
    pub fn new(
        flights: Arc<dyn FlightRepository>,
        bookings: Arc<dyn BookingRepository>,
        policy: BookingPolicy,
    ) -> Self {
        Self {
            flights,
            bookings,
            policy,
            events: None,
        }
    }

    pub fn with_events(mut self, events: broadcast::Sender<BookingConfirmedEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Book one seat.
    ///
    /// The work after validation runs on its own task: once a seat has been
    /// claimed, the booking record is written (or the claim released) even if
    /// the caller stops waiting.
    pub async fn book(&self, request: BookingRequest) -> BookingResult<Booking> {
        let validated = request.validate()?;

        let this = self.clone();
        tokio::spawn(async move { this.claim_and_persist(validated).await })
            .await
            .map_err(|e| BookingError::StoreUnavailable(format!("booking task failed: {e}")))?
    }

    async fn claim_and_persist(&self, request: ValidatedRequest) -> BookingResult<Booking> {
        let flight_id = request.flight_id;
        let seat = request.seat_number;

        let flight = self
            .flights
            .get_flight(flight_id)
            .await?
            .ok_or(BookingError::FlightNotFound(flight_id))?;

        if !flight.seat_in_range(seat) {
            return Err(BookingError::SeatOutOfRange {
                seat: i64::from(seat),
                capacity: Some(flight.capacity),
            });
        }

        match self.flights.claim_seat(flight_id, seat).await? {
            ClaimOutcome::Claimed => {}
            ClaimOutcome::SeatTaken => return Err(BookingError::SeatAlreadyBooked { seat }),
            ClaimOutcome::OutOfRange { capacity } => {
                return Err(BookingError::SeatOutOfRange {
                    seat: i64::from(seat),
                    capacity: Some(capacity),
                })
            }
            ClaimOutcome::FlightNotFound => return Err(BookingError::FlightNotFound(flight_id)),
        }

        let booking = Booking::new(&request.user, flight_id, seat, &request.payment_token);
        self.persist(&booking).await?;

        info!(
            "Booking confirmed: {} (flight {}, seat {})",
            booking.id, booking.flight_id, booking.seat_number
        );

        if let Some(events) = &self.events {
            // No subscribers is not an error.
            let _ = events.send(BookingConfirmedEvent::from(&booking));
        }

        Ok(booking)
    }

    /// Write the booking for an already-claimed seat, retrying the same record.
    /// When every attempt fails the claim is released.
    async fn persist(&self, booking: &Booking) -> BookingResult<()> {
        let attempts = self.policy.persist_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match self.bookings.insert_booking(booking).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!(
                        "Failed to save booking {} (attempt {}/{}): {}",
                        booking.id, attempt, attempts, e
                    );
                    last_error = e.to_string();
                    if attempt < attempts {
                        tokio::time::sleep(self.policy.retry_backoff * attempt).await;
                    }
                }
            }
        }

        // A write can commit even though its reply was lost.
        match self.bookings.booking_exists(booking.id).await {
            Ok(true) => {
                warn!(
                    "Booking {} was saved despite reported failures: {}",
                    booking.id, last_error
                );
                return Ok(());
            }
            Ok(false) => {}
            Err(e) => warn!("Could not check whether booking {} was saved: {}", booking.id, e),
        }

        self.release(booking).await;
        Err(BookingError::PersistFailed(last_error))
    }

    async fn release(&self, booking: &Booking) {
        let attempts = self.policy.persist_attempts.max(1);
        for attempt in 1..=attempts {
            match self.flights.release_seat(booking.flight_id, booking.seat_number).await {
                Ok(()) => {
                    warn!(
                        "Released seat {} on flight {} after failed booking {}",
                        booking.seat_number, booking.flight_id, booking.id
                    );
                    return;
                }
                Err(e) => {
                    if attempt < attempts {
                        tokio::time::sleep(self.policy.retry_backoff * attempt).await;
                    } else {
                        error!(
                            "Seat {} on flight {} stays claimed without a booking: {}",
                            booking.seat_number, booking.flight_id, e
                        );
                    }
                }
            }
        }
    }

    pub async fn flights(&self) -> BookingResult<Vec<Flight>> {
        Ok(self.flights.list_flights().await?)
    }

    pub async fn flight(&self, raw_id: &str) -> BookingResult<Flight> {
        let id = parse_flight_id(raw_id)?;
        self.flights
            .get_flight(id)
            .await?
            .ok_or(BookingError::FlightNotFound(id))
    }

    /// All bookings with their flights expanded.
    pub async fn bookings(&self) -> BookingResult<Vec<BookingView>> {
        let bookings = self.bookings.list_bookings().await?;
        let flights: HashMap<Uuid, Flight> = self
            .flights
            .list_flights()
            .await?
            .into_iter()
            .map(|f| (f.id, f))
            .collect();

        Ok(bookings
            .into_iter()
            .map(|b| {
                let flight = flights.get(&b.flight_id).cloned();
                BookingView::resolve(b, flight)
            })
            .collect())
    }

    /// Replace all flights with the starter schedule.
    pub async fn seed(&self) -> BookingResult<Vec<Flight>> {
        let flights = self.flights.seed_flights(starter_flights()).await?;
        info!("Seeded {} flights", flights.len());
        Ok(flights)
    }

    /// Seed only when the store holds no flights. Returns whether it seeded.
    pub async fn seed_if_empty(&self) -> BookingResult<bool> {
        if self.flights.count_flights().await? > 0 {
            info!("Flights already exist, skipping seeding");
            return Ok(false);
        }
        self.seed().await?;
        Ok(true)
    }
}
