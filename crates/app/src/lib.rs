//! Kolab application composition root
//!
//! Composes the domain routers into a single application.

use axum::Router;
use kolab_collaborations::{CollaborationsRepositories, CollaborationsState};
use sqlx::PgPool;

/// Create the main application router with all routes and middleware
pub async fn create_app(pool: PgPool) -> Result<Router, anyhow::Error> {
    let collaborations_state = CollaborationsState {
        repos: CollaborationsRepositories::new(pool),
    };

    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .route("/", axum::routing::get(|| async { "Kolab API v0.1.0" }))
        .merge(kolab_collaborations::routes().with_state(collaborations_state));

    Ok(app)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
