use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::flight::Flight;
use crate::pii::Masked;

/// A confirmed seat reservation. Immutable once persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub user: String,
    pub flight_id: Uuid,
    pub seat_number: u32,
    #[serde(skip_serializing)]
    pub payment_token: Masked<String>,
    pub booked_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(user: &str, flight_id: Uuid, seat_number: u32, payment_token: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            user: user.to_string(),
            flight_id,
            seat_number,
            payment_token: Masked(payment_token.to_string()),
            booked_at: Utc::now(),
        }
    }
}

/// A booking with its flight expanded, as listed to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    pub id: Uuid,
    pub user: String,
    pub flight: Option<Flight>,
    pub seat_number: u32,
    pub booked_at: DateTime<Utc>,
}

impl BookingView {
    pub fn resolve(booking: Booking, flight: Option<Flight>) -> Self {
        Self {
            id: booking.id,
            user: booking.user,
            flight,
            seat_number: booking.seat_number,
            booked_at: booking.booked_at,
        }
    }
}
