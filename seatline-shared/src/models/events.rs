use uuid::Uuid;

use super::booking::Booking;

/// Published after a booking record has been persisted.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmedEvent {
    pub booking_id: Uuid,
    pub flight_id: Uuid,
    pub seat_number: u32,
    pub booked_at: i64,
}

impl From<&Booking> for BookingConfirmedEvent {
    fn from(booking: &Booking) -> Self {
        Self {
            booking_id: booking.id,
            flight_id: booking.flight_id,
            seat_number: booking.seat_number,
            booked_at: booking.booked_at.timestamp(),
        }
    }
}
