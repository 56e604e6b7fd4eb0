use async_trait::async_trait;
use seatline_core::{BookingRepository, ClaimOutcome, FlightRepository, StoreError, StoreResult};
use seatline_shared::{Booking, Flight, NewFlight};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

#[derive(Default)]
struct FlightTable {
    order: Vec<Uuid>,
    by_id: HashMap<Uuid, Arc<Mutex<Flight>>>,
}

/// Process-local flight and booking store.
///
/// Each flight sits behind its own mutex, so claims on one flight never wait
/// for claims on another. Lock order is always table, then flight, then
/// bookings.
#[derive(Default)]
pub struct MemoryStore {
    flights: RwLock<FlightTable>,
    bookings: RwLock<Vec<Booking>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FlightRepository for MemoryStore {
    async fn get_flight(&self, id: Uuid) -> StoreResult<Option<Flight>> {
        let table = self.flights.read().await;
        match table.by_id.get(&id) {
            Some(slot) => Ok(Some(slot.lock().await.clone())),
            None => Ok(None),
        }
    }

    async fn list_flights(&self) -> StoreResult<Vec<Flight>> {
        let table = self.flights.read().await;
        let mut flights = Vec::with_capacity(table.order.len());
        for id in &table.order {
            if let Some(slot) = table.by_id.get(id) {
                flights.push(slot.lock().await.clone());
            }
        }
        Ok(flights)
    }

    async fn count_flights(&self) -> StoreResult<usize> {
        Ok(self.flights.read().await.order.len())
    }

    async fn claim_seat(&self, id: Uuid, seat_number: u32) -> StoreResult<ClaimOutcome> {
        let table = self.flights.read().await;
        let Some(slot) = table.by_id.get(&id) else {
            return Ok(ClaimOutcome::FlightNotFound);
        };

        let mut flight = slot.lock().await;
        if !flight.seat_in_range(seat_number) {
            return Ok(ClaimOutcome::OutOfRange { capacity: flight.capacity });
        }
        if !flight.booked_seats.insert(seat_number) {
            return Ok(ClaimOutcome::SeatTaken);
        }
        Ok(ClaimOutcome::Claimed)
    }

    async fn release_seat(&self, id: Uuid, seat_number: u32) -> StoreResult<()> {
        let table = self.flights.read().await;
        let Some(slot) = table.by_id.get(&id) else {
            return Ok(());
        };

        let mut flight = slot.lock().await;
        let referenced = self
            .bookings
            .read()
            .await
            .iter()
            .any(|b| b.flight_id == id && b.seat_number == seat_number);
        if !referenced {
            flight.booked_seats.remove(&seat_number);
        }
        Ok(())
    }

    async fn seed_flights(&self, records: Vec<NewFlight>) -> StoreResult<Vec<Flight>> {
        let mut table = self.flights.write().await;
        let mut bookings = self.bookings.write().await;

        let flights: Vec<Flight> = records.into_iter().map(Flight::new).collect();
        table.order = flights.iter().map(|f| f.id).collect();
        table.by_id = flights
            .iter()
            .map(|f| (f.id, Arc::new(Mutex::new(f.clone()))))
            .collect();
        bookings.clear();

        Ok(flights)
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn insert_booking(&self, booking: &Booking) -> StoreResult<()> {
        // Held until the booking is written so a reseed cannot slip in between.
        let table = self.flights.read().await;
        let Some(slot) = table.by_id.get(&booking.flight_id) else {
            return Err(StoreError::Backend(format!(
                "flight {} no longer exists",
                booking.flight_id
            )));
        };
        let flight = slot.lock().await;
        if !flight.is_booked(booking.seat_number) {
            return Err(StoreError::Backend(format!(
                "seat {} on flight {} is not claimed",
                booking.seat_number, booking.flight_id
            )));
        }

        let mut bookings = self.bookings.write().await;
        if bookings.iter().any(|b| b.id == booking.id) {
            return Ok(());
        }
        if bookings
            .iter()
            .any(|b| b.flight_id == booking.flight_id && b.seat_number == booking.seat_number)
        {
            return Err(StoreError::Backend(format!(
                "seat {} on flight {} already has a booking",
                booking.seat_number, booking.flight_id
            )));
        }
        bookings.push(booking.clone());
        Ok(())
    }

    async fn booking_exists(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.bookings.read().await.iter().any(|b| b.id == id))
    }

    async fn list_bookings(&self) -> StoreResult<Vec<Booking>> {
        Ok(self.bookings.read().await.clone())
    }
}
