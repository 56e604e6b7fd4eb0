pub mod models;
pub mod pii;

pub use models::booking::{Booking, BookingView};
pub use models::events::BookingConfirmedEvent;
pub use models::flight::{Flight, NewFlight};
pub use pii::Masked;
