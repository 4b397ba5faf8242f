pub mod health;
pub mod preview;
pub mod projects;

use axum::Router;

use crate::server::AppState;

/// Build the `/api` route tree.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(projects::router())
        .merge(preview::router())
}
