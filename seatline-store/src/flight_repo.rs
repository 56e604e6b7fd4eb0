use async_trait::async_trait;
use seatline_core::{ClaimOutcome, FlightRepository, StoreResult};
use seatline_shared::{Flight, NewFlight};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::store_error;

pub struct PostgresFlightRepository {
    pool: PgPool,
}

impl PostgresFlightRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct FlightRow {
    id: Uuid,
    origin: String,
    destination: String,
    date: String,
    time: String,
    capacity: i32,
    booked_seats: Vec<i32>,
}

impl From<FlightRow> for Flight {
    fn from(row: FlightRow) -> Self {
        Flight {
            id: row.id,
            origin: row.origin,
            destination: row.destination,
            date: row.date,
            time: row.time,
            capacity: row.capacity.max(0) as u32,
            booked_seats: row
                .booked_seats
                .into_iter()
                .filter_map(|s| u32::try_from(s).ok())
                .collect(),
        }
    }
}

#[derive(sqlx::FromRow)]
struct OccupancyRow {
    capacity: i32,
}

const FLIGHT_COLUMNS: &str = "id, origin, destination, date, time, capacity, booked_seats";

#[async_trait]
impl FlightRepository for PostgresFlightRepository {
    async fn get_flight(&self, id: Uuid) -> StoreResult<Option<Flight>> {
        let row = sqlx::query_as::<_, FlightRow>(&format!(
            "SELECT {FLIGHT_COLUMNS} FROM flights WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(row.map(Flight::from))
    }

    async fn list_flights(&self) -> StoreResult<Vec<Flight>> {
        let rows = sqlx::query_as::<_, FlightRow>(&format!(
            "SELECT {FLIGHT_COLUMNS} FROM flights ORDER BY seq"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(rows.into_iter().map(Flight::from).collect())
    }

    async fn count_flights(&self) -> StoreResult<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM flights")
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(count.max(0) as usize)
    }

    async fn claim_seat(&self, id: Uuid, seat_number: u32) -> StoreResult<ClaimOutcome> {
        let seat = i32::try_from(seat_number).unwrap_or(i32::MAX);

        // Single statement: the row lock serializes concurrent claims and the
        // predicate is re-checked against the latest row version.
        let claimed = sqlx::query(
            r#"
            UPDATE flights
            SET booked_seats = array_append(booked_seats, $2)
            WHERE id = $1
              AND $2 BETWEEN 1 AND capacity
              AND NOT ($2 = ANY(booked_seats))
            "#,
        )
        .bind(id)
        .bind(seat)
        .execute(&self.pool)
        .await
        .map_err(store_error)?
        .rows_affected();

        if claimed == 1 {
            return Ok(ClaimOutcome::Claimed);
        }

        // Nothing changed; work out why.
        let row = sqlx::query_as::<_, OccupancyRow>("SELECT capacity FROM flights WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(match row {
            None => ClaimOutcome::FlightNotFound,
            Some(r) if seat < 1 || seat > r.capacity => ClaimOutcome::OutOfRange {
                capacity: r.capacity.max(0) as u32,
            },
            Some(_) => ClaimOutcome::SeatTaken,
        })
    }

    async fn release_seat(&self, id: Uuid, seat_number: u32) -> StoreResult<()> {
        let seat = i32::try_from(seat_number).unwrap_or(i32::MAX);

        sqlx::query(
            r#"
            UPDATE flights
            SET booked_seats = array_remove(booked_seats, $2)
            WHERE id = $1
              AND NOT EXISTS (
                  SELECT 1 FROM bookings WHERE flight_id = $1 AND seat_number = $2
              )
            "#,
        )
        .bind(id)
        .bind(seat)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(())
    }

    async fn seed_flights(&self, records: Vec<NewFlight>) -> StoreResult<Vec<Flight>> {
        let mut tx = self.pool.begin().await.map_err(store_error)?;

        // Claims block on the table lock until the new schedule is committed.
        sqlx::query("LOCK TABLE flights, bookings IN EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await
            .map_err(store_error)?;
        sqlx::query("DELETE FROM bookings")
            .execute(&mut *tx)
            .await
            .map_err(store_error)?;
        sqlx::query("DELETE FROM flights")
            .execute(&mut *tx)
            .await
            .map_err(store_error)?;

        let mut flights = Vec::with_capacity(records.len());
        for record in records {
            let flight = Flight::new(record);
            sqlx::query(
                r#"
                INSERT INTO flights (id, origin, destination, date, time, capacity, booked_seats)
                VALUES ($1, $2, $3, $4, $5, $6, '{}')
                "#,
            )
            .bind(flight.id)
            .bind(&flight.origin)
            .bind(&flight.destination)
            .bind(&flight.date)
            .bind(&flight.time)
            .bind(i32::try_from(flight.capacity).unwrap_or(i32::MAX))
            .execute(&mut *tx)
            .await
            .map_err(store_error)?;
            flights.push(flight);
        }

        tx.commit().await.map_err(store_error)?;
        Ok(flights)
    }
}
