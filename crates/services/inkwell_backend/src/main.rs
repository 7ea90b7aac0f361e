// --- File: crates/services/inkwell_backend/src/main.rs ---
mod app_state;
mod service_factory;

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::info;

use app_state::AppState;
use inkwell_booking::handlers::BookingState;
use inkwell_config::load_config;

#[tokio::main]
async fn main() {
    inkwell_common::logging::init();

    let config = Arc::new(load_config().expect("Failed to load config"));
    let state = AppState::new(config.clone())
        .await
        .expect("Failed to initialize database");

    let booking_state = Arc::new(BookingState {
        config: config.clone(),
        repo: state.repo.clone(),
        services: state.service_factory.clone(),
    });

    let api_router = Router::new()
        .route("/", get(|| async { "Inkwell booking API" }))
        .merge(inkwell_booking::routes(booking_state));

    let mut app = Router::new().nest("/api", api_router);

    // Uploaded reference images, for the studio's admin view.
    app = app.nest_service("/uploads", ServeDir::new(&config.upload.dir));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server address");
    info!("Listening on http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}
