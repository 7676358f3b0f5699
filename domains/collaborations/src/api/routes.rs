//! Route definitions for the collaboration lifecycle API

use axum::{
    routing::{get, patch, post},
    Router,
};

use super::handlers::{collaborations, deliverables, disputes, payments};
use super::middleware::CollaborationsState;

/// Create all collaboration lifecycle API routes
pub fn routes() -> Router<CollaborationsState> {
    Router::new()
        .route(
            "/v1/collaborations",
            post(collaborations::create_collaboration).get(collaborations::list_collaborations),
        )
        .route(
            "/v1/collaborations/{id}",
            get(collaborations::get_collaboration),
        )
        .route(
            "/v1/collaborations/{id}/status",
            patch(collaborations::update_collaboration_status),
        )
        .route(
            "/v1/collaborations/{id}/deliverables",
            post(deliverables::create_deliverable).get(deliverables::list_deliverables),
        )
        .route("/v1/deliverables/{id}", get(deliverables::get_deliverable))
        .route(
            "/v1/deliverables/{id}/status",
            patch(deliverables::update_deliverable_status),
        )
        .route(
            "/v1/collaborations/{id}/payments",
            post(payments::create_payment).get(payments::list_payments),
        )
        .route("/v1/payments/{id}", get(payments::get_payment))
        .route(
            "/v1/payments/{id}/status",
            patch(payments::update_payment_status),
        )
        .route(
            "/v1/collaborations/{id}/disputes",
            post(disputes::open_dispute).get(disputes::list_disputes),
        )
        .route("/v1/disputes/{id}", get(disputes::get_dispute))
        .route(
            "/v1/disputes/{id}/status",
            patch(disputes::update_dispute_status),
        )
        .route("/v1/disputes/{id}/resolve", post(disputes::resolve_dispute))
}
