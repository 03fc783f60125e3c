use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

pub mod error;
pub mod routes;
pub mod state;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health_check))
        .route("/bars/:ticker/:start/:end", get(routes::get_aggregate_bars))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
