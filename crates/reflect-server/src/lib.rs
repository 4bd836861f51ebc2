//! Reflect Server
//!
//! Serves the learning journal site and the reflections JSON API on top of
//! the shared entry store.

pub mod api;
pub mod error;
pub mod state;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::{Error, Result};
pub use state::AppState;

/// Build the application router with its layers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(api::routes(&state))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
