pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod middleware;
pub mod startup;
pub mod validation;

use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::cors::CorsLayer;

use crate::gateway::GatewayClient;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub gateway: GatewayClient,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/payment/process", post(handlers::payments::process_payment))
        .route(
            "/payment/transaction/:id",
            get(handlers::payments::get_transaction),
        )
        .route(
            "/subscriptions/cancel",
            delete(handlers::subscriptions::cancel_subscription),
        )
        .layer(axum::middleware::from_fn(
            middleware::request_logger::request_logger_middleware,
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
