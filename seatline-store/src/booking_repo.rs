use async_trait::async_trait;
use chrono::{DateTime, Utc};
use seatline_core::{BookingRepository, StoreResult};
use seatline_shared::{Booking, Masked};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::store_error;

pub struct PostgresBookingRepository {
    pool: PgPool,
}

impl PostgresBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    user_id: String,
    flight_id: Uuid,
    seat_number: i32,
    payment_token: String,
    booked_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Booking {
            id: row.id,
            user: row.user_id,
            flight_id: row.flight_id,
            seat_number: row.seat_number.max(0) as u32,
            payment_token: Masked(row.payment_token),
            booked_at: row.booked_at,
        }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    async fn insert_booking(&self, booking: &Booking) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO bookings (id, user_id, flight_id, seat_number, payment_token, booked_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(booking.id)
        .bind(&booking.user)
        .bind(booking.flight_id)
        .bind(i32::try_from(booking.seat_number).unwrap_or(i32::MAX))
        .bind(booking.payment_token.expose())
        .bind(booking.booked_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(())
    }

    async fn booking_exists(&self, id: Uuid) -> StoreResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM bookings WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(exists)
    }

    async fn list_bookings(&self) -> StoreResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT id, user_id, flight_id, seat_number, payment_token, booked_at
            FROM bookings
            ORDER BY booked_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(rows.into_iter().map(Booking::from).collect())
    }
}
