use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::api::handlers;
use crate::service::PortfolioService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PortfolioService>,
}

async fn health() -> &'static str {
    "healthy"
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/positions", get(handlers::list_positions))
        .route("/positions/buy", post(handlers::buy))
        .route("/positions/sell", post(handlers::sell))
        .route("/prices/refresh", post(handlers::refresh_prices))
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
