//! Page Routes
//!
//! Serves the site's HTML templates and static assets as plain files.
//!
//! Routes:
//! - GET / - index.html
//! - GET /journal - journal.html
//! - GET /about - about.html
//! - GET /projects - projects.html
//! - GET /static/* - files under the static directory

use axum::Router;
use reflect_core::ServerConfig;
use tower_http::services::{ServeDir, ServeFile};

use crate::AppState;

/// Page paths and the template each one serves.
pub const PAGES: &[(&str, &str)] = &[
    ("/", "index.html"),
    ("/journal", "journal.html"),
    ("/about", "about.html"),
    ("/projects", "projects.html"),
];

/// Build page and static file routes.
pub fn routes(server: &ServerConfig) -> Router<AppState> {
    let router = PAGES
        .iter()
        .fold(Router::new(), |router, &(path, template)| {
            router.route_service(path, ServeFile::new(server.templates_dir.join(template)))
        });

    router.nest_service("/static", ServeDir::new(&server.static_dir))
}
