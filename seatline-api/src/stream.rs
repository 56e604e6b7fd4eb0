use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures_util::{Stream, StreamExt};
use tokio_stream::wrappers::BroadcastStream;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/flights/{id}/stream", get(seat_stream))
}

/// Server-sent `seat_booked` events for one flight.
async fn seat_stream(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, AppError> {
    let flight_id = state.coordinator.flight(&id).await?.id;
    let rx = state.events.subscribe();

    // Lagged receivers skip the missed events.
    let stream = BroadcastStream::new(rx).filter_map(move |message| async move {
        match message {
            Ok(event) if event.flight_id == flight_id => {
                Some(Event::default().event("seat_booked").json_data(&event))
            }
            _ => None,
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
