//! Payment API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use kolab_common::{db::require_cas_row, Error, Pagination, Result};

use crate::api::middleware::CollaborationsState;
use crate::domain::coordinator;
use crate::domain::entities::{Payment, PaymentStatus};
use crate::repository::transactions::{
    find_collaboration_for_update, find_payment_for_update, update_payment_status_tx,
};

/// Payment response DTO
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: Uuid,
    pub collaboration_id: Uuid,
    pub amount: Decimal,
    pub platform_commission: Decimal,
    pub influencer_payout: Decimal,
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Payment> for PaymentResponse {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id,
            collaboration_id: p.collaboration_id,
            amount: p.amount,
            platform_commission: p.platform_commission,
            influencer_payout: p.influencer_payout,
            status: p.status,
            transaction_id: p.transaction_id,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Request for creating a payment
#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    pub amount: Decimal,
    pub platform_commission: Decimal,
    pub influencer_payout: Decimal,
}

/// Request for updating a payment's escrow status
#[derive(Debug, Deserialize)]
pub struct UpdatePaymentStatusRequest {
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
}

/// Create a payment for a collaboration.
///
/// Commission terms may be set up-front, so the collaboration's status is
/// not constrained here; only its existence and the commission arithmetic
/// are validated.
pub async fn create_payment(
    State(state): State<CollaborationsState>,
    Path(collaboration_id): Path<Uuid>,
    Json(req): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<PaymentResponse>)> {
    if state
        .repos
        .collaborations
        .find(collaboration_id)
        .await?
        .is_none()
    {
        return Err(Error::NotFound(format!(
            "collaboration {collaboration_id} not found"
        )));
    }

    let payment = Payment::new(
        collaboration_id,
        req.amount,
        req.platform_commission,
        req.influencer_payout,
    )?;
    let created = state.repos.payments.create(&payment).await?;

    tracing::info!(
        payment_id = %created.id,
        collaboration_id = %collaboration_id,
        amount = %created.amount,
        "payment created"
    );
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Get a single payment by ID
pub async fn get_payment(
    State(state): State<CollaborationsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentResponse>> {
    let payment = state
        .repos
        .payments
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("payment {id} not found")))?;
    Ok(Json(payment.into()))
}

/// List payments for a collaboration
pub async fn list_payments(
    State(state): State<CollaborationsState>,
    Path(collaboration_id): Path<Uuid>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<PaymentResponse>>> {
    if state
        .repos
        .collaborations
        .find(collaboration_id)
        .await?
        .is_none()
    {
        return Err(Error::NotFound(format!(
            "collaboration {collaboration_id} not found"
        )));
    }

    let payments = state
        .repos
        .payments
        .list_by_collaboration(collaboration_id, page.limit(), page.offset())
        .await?;
    Ok(Json(payments.into_iter().map(Into::into).collect()))
}

/// Advance a payment's escrow status.
///
/// Release requires the parent collaboration to be completed; the parent row
/// stays locked from the check to the commit so a concurrent collaboration
/// transition cannot slip in between.
pub async fn update_payment_status(
    State(state): State<CollaborationsState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePaymentStatusRequest>,
) -> Result<Json<PaymentResponse>> {
    let mut tx = state.repos.begin().await?;

    let mut payment = find_payment_for_update(&mut tx, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("payment {id} not found")))?;
    let collaboration = find_collaboration_for_update(&mut tx, payment.collaboration_id)
        .await?
        .ok_or_else(|| {
            Error::Internal(format!(
                "payment {id} references missing collaboration {}",
                payment.collaboration_id
            ))
        })?;

    coordinator::ensure_payment_transition_allowed(req.status, collaboration.status)?;

    let previous = payment.status;
    payment.update_status(req.status, req.transaction_id)?;
    let row = update_payment_status_tx(&mut tx, &payment, previous).await?;
    let updated = require_cas_row(row, "payment", id)?;
    tx.commit().await?;

    tracing::info!(
        payment_id = %updated.id,
        from = %previous,
        to = %updated.status,
        "payment status updated"
    );
    Ok(Json(updated.into()))
}
