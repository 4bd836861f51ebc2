//! API Routes for Reflect
//!
//! This module combines all routes into a single router.

pub mod pages;
pub mod reflections;
pub mod status;

use axum::Router;

use crate::AppState;

/// Build the complete router.
///
/// Route structure:
/// - /, /journal, /about, /projects - Site pages
/// - /static/* - Static assets
/// - /api/reflections/* - Journal entry API
/// - /health - Health check
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(status::routes())
        .merge(pages::routes(&state.server))
        .nest("/api/reflections", reflections::routes())
}
