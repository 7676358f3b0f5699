//! Transaction helpers for the collaboration lifecycle domain
//!
//! Cross-entity writes lock the parent collaboration row (`FOR UPDATE`) and
//! perform the child write in the same transaction, so the parent's status
//! cannot change between the coordinator's check and the commit.

use super::collaborations::COLLABORATION_COLUMNS;
use super::deliverables::DELIVERABLE_COLUMNS;
use super::payments::PAYMENT_COLUMNS;
use crate::domain::entities::{Collaboration, Deliverable, Payment, PaymentStatus};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

/// Read a collaboration and lock its row for the remainder of the
/// transaction
pub async fn find_collaboration_for_update(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<Option<Collaboration>, sqlx::Error> {
    let query =
        format!("SELECT {COLLABORATION_COLUMNS} FROM collaborations WHERE id = $1 FOR UPDATE");
    let row = sqlx::query_as::<_, Collaboration>(&query)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(row)
}

/// Create a deliverable within a transaction
pub async fn create_deliverable_tx(
    tx: &mut Transaction<'_, Postgres>,
    deliverable: &Deliverable,
) -> Result<Deliverable, sqlx::Error> {
    let query = format!(
        "INSERT INTO deliverables ({DELIVERABLE_COLUMNS}) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         RETURNING {DELIVERABLE_COLUMNS}"
    );
    let row = sqlx::query_as::<_, Deliverable>(&query)
        .bind(deliverable.id)
        .bind(deliverable.collaboration_id)
        .bind(&deliverable.title)
        .bind(&deliverable.description)
        .bind(&deliverable.file_url)
        .bind(deliverable.status)
        .bind(&deliverable.feedback)
        .bind(deliverable.submitted_at)
        .bind(deliverable.created_at)
        .bind(deliverable.updated_at)
        .fetch_one(&mut **tx)
        .await?;
    Ok(row)
}

/// Update a payment's status within a transaction, compare-and-swapping on
/// the previous status. Returns `None` when a concurrent transition won.
pub async fn update_payment_status_tx(
    tx: &mut Transaction<'_, Postgres>,
    payment: &Payment,
    expected: PaymentStatus,
) -> Result<Option<Payment>, sqlx::Error> {
    let query = format!(
        "UPDATE payments SET status = $2, transaction_id = $3, updated_at = $4 \
         WHERE id = $1 AND status = $5 \
         RETURNING {PAYMENT_COLUMNS}"
    );
    let row = sqlx::query_as::<_, Payment>(&query)
        .bind(payment.id)
        .bind(payment.status)
        .bind(&payment.transaction_id)
        .bind(payment.updated_at)
        .bind(expected)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(row)
}

/// Find a payment by ID within a transaction, locking its row
pub async fn find_payment_for_update(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<Option<Payment>, sqlx::Error> {
    let query = format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1 FOR UPDATE");
    let row = sqlx::query_as::<_, Payment>(&query)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(row)
}
