use axum::{http::Method, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod admin;
pub mod bookings;
pub mod error;
pub mod flights;
pub mod state;
pub mod stream;

pub use state::AppState;

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(flights::routes())
        .merge(bookings::routes())
        .merge(admin::routes())
        .merge(stream::routes())
}

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    // Served both at the root and under /api, where the bundled web client
    // looks for it.
    Router::new()
        .route("/health", get(health))
        .merge(api_routes())
        .nest("/api", api_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
