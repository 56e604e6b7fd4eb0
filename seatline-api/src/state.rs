use seatline_core::BookingCoordinator;
use seatline_shared::BookingConfirmedEvent;
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct AppState {
    pub coordinator: BookingCoordinator,
    pub events: broadcast::Sender<BookingConfirmedEvent>,
}

impl AppState {
    /// Wires the coordinator to publish confirmed bookings on `events`.
    pub fn new(coordinator: BookingCoordinator, events: broadcast::Sender<BookingConfirmedEvent>) -> Self {
        Self {
            coordinator: coordinator.with_events(events.clone()),
            events,
        }
    }
}
