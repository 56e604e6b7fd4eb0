use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use seatline_api::{app, AppState};
use seatline_core::{BookingCoordinator, BookingPolicy};
use seatline_store::Storage;
use serde_json::{json, Value};
use tokio::sync::broadcast;
use tower::ServiceExt;

async fn test_app() -> Router {
    let storage = Storage::in_memory();
    let coordinator = BookingCoordinator::new(
        storage.flights.clone(),
        storage.bookings.clone(),
        BookingPolicy::default(),
    );
    let (events, _) = broadcast::channel(16);
    let state = AppState::new(coordinator, events);
    state.coordinator.seed().await.unwrap();
    app(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn first_flight_id(app: &Router) -> String {
    let (status, flights) = send(app, Method::GET, "/flights", None).await;
    assert_eq!(status, StatusCode::OK);
    flights[0]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_list_and_get_flights() {
    let app = test_app().await;

    let (status, flights) = send(&app, Method::GET, "/flights", None).await;
    assert_eq!(status, StatusCode::OK);
    let flights = flights.as_array().unwrap();
    assert_eq!(flights.len(), 10);
    assert_eq!(flights[0]["origin"], "India");
    assert_eq!(flights[0]["capacity"], 60);
    assert_eq!(flights[0]["availableSeats"], 60);
    assert_eq!(flights[0]["bookedSeats"], json!([]));

    let id = flights[0]["id"].as_str().unwrap();
    let (status, flight) = send(&app, Method::GET, &format!("/api/flights/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(flight["id"], id);

    let (status, body) = send(&app, Method::GET, "/flights/not-a-real-id", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["category"], "InvalidFlightId");

    let missing = uuid::Uuid::new_v4();
    let (status, body) = send(&app, Method::GET, &format!("/flights/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["category"], "FlightNotFound");
}

#[tokio::test]
async fn test_book_seat_then_conflict() {
    let app = test_app().await;
    let flight_id = first_flight_id(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/book",
        Some(json!({ "user": "alice", "flightId": flight_id, "seatNumber": 12, "paymentToken": "tok1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking"]["user"], "alice");
    assert_eq!(body["booking"]["seatNumber"], 12);
    assert!(body["booking"].get("paymentToken").is_none());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/book",
        Some(json!({ "user": "bob", "flightId": flight_id, "seatNumber": 12, "paymentCode": "tok2" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["category"], "SeatAlreadyBooked");
    assert_eq!(body["error"], "Seat 12 already booked");

    let (_, flight) = send(&app, Method::GET, &format!("/flights/{flight_id}"), None).await;
    assert_eq!(flight["bookedSeats"], json!([12]));

    let (status, bookings) = send(&app, Method::GET, "/bookings", None).await;
    assert_eq!(status, StatusCode::OK);
    let bookings = bookings.as_array().unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["user"], "alice");
    assert_eq!(bookings[0]["flight"]["id"], flight_id.as_str());
}

#[tokio::test]
async fn test_booking_validation_errors() {
    let app = test_app().await;
    let flight_id = first_flight_id(&app).await;

    let cases = [
        (json!({ "user": "carol", "flightId": flight_id, "seatNumber": 5, "paymentToken": "" }), StatusCode::BAD_REQUEST, "InvalidPayment"),
        (json!({ "user": "carol", "flightId": flight_id, "seatNumber": 5 }), StatusCode::BAD_REQUEST, "InvalidPayment"),
        (json!({ "user": "dave", "flightId": "not-a-real-id", "seatNumber": 1, "paymentToken": "tok3" }), StatusCode::BAD_REQUEST, "InvalidFlightId"),
        (json!({ "user": "dave", "flightId": uuid::Uuid::new_v4(), "seatNumber": 1, "paymentToken": "tok3" }), StatusCode::NOT_FOUND, "FlightNotFound"),
        (json!({ "user": "erin", "flightId": flight_id, "seatNumber": 61, "paymentToken": "tok" }), StatusCode::BAD_REQUEST, "SeatOutOfRange"),
        (json!({ "user": "erin", "flightId": flight_id, "seatNumber": -3, "paymentToken": "tok" }), StatusCode::BAD_REQUEST, "SeatOutOfRange"),
        (json!({ "user": "erin", "flightId": flight_id, "paymentToken": "tok" }), StatusCode::BAD_REQUEST, "InvalidRequest"),
    ];

    for (body, expected_status, expected_category) in cases {
        let (status, response) = send(&app, Method::POST, "/book", Some(body.clone())).await;
        assert_eq!(status, expected_status, "{body}");
        assert_eq!(response["category"], expected_category, "{body}");
    }

    let (_, bookings) = send(&app, Method::GET, "/bookings", None).await;
    assert_eq!(bookings, json!([]));
    let (_, flight) = send(&app, Method::GET, &format!("/flights/{flight_id}"), None).await;
    assert_eq!(flight["bookedSeats"], json!([]));
}

#[tokio::test]
async fn test_seed_replaces_flights() {
    let app = test_app().await;
    let old_id = first_flight_id(&app).await;

    let (status, body) = send(&app, Method::POST, "/seed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["flights"], 10);

    let (status, body) = send(&app, Method::GET, "/api/seed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["flights"], 10);

    let (_, flights) = send(&app, Method::GET, "/flights", None).await;
    let flights = flights.as_array().unwrap();
    assert_eq!(flights.len(), 10);
    assert!(flights.iter().all(|f| f["capacity"] == 60 && f["id"] != old_id.as_str()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_for_one_seat() {
    let app = test_app().await;
    let flight_id = first_flight_id(&app).await;

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let app = app.clone();
            let body = json!({ "user": format!("user-{i}"), "flightId": flight_id, "seatNumber": 1, "paymentToken": "tok" });
            tokio::spawn(async move { send(&app, Method::POST, "/book", Some(body)).await.0 })
        })
        .collect();

    let mut ok = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::OK => ok += 1,
            StatusCode::CONFLICT => conflicts += 1,
            other => panic!("unexpected status {other}"),
        }
    }
    assert_eq!(ok, 1);
    assert_eq!(conflicts, 19);
}

#[tokio::test]
async fn test_health_and_stream_for_unknown_flight() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let missing = uuid::Uuid::new_v4();
    let (status, _) = send(&app, Method::GET, &format!("/flights/{missing}/stream"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
