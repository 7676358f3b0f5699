//! Payment repository
//!
//! The release path lives in `transactions.rs` because it must read the
//! parent collaboration's status under lock while updating the payment.

use crate::domain::entities::Payment;
use kolab_common::{db::require_cas_row, Result};
use sqlx::PgPool;
use uuid::Uuid;

pub(crate) const PAYMENT_COLUMNS: &str = "id, collaboration_id, amount, platform_commission, \
     influencer_payout, status, transaction_id, created_at, updated_at";

#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find payment by ID
    pub async fn find(&self, id: Uuid) -> Result<Option<Payment>> {
        let query = format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1");
        let row = sqlx::query_as::<_, Payment>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// List payments for a collaboration
    pub async fn list_by_collaboration(
        &self,
        collaboration_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Payment>> {
        let query = format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments \
             WHERE collaboration_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, Payment>(&query)
            .bind(collaboration_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Create a new payment
    pub async fn create(&self, payment: &Payment) -> Result<Payment> {
        let query = format!(
            "INSERT INTO payments ({PAYMENT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {PAYMENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Payment>(&query)
            .bind(payment.id)
            .bind(payment.collaboration_id)
            .bind(payment.amount)
            .bind(payment.platform_commission)
            .bind(payment.influencer_payout)
            .bind(payment.status)
            .bind(&payment.transaction_id)
            .bind(payment.created_at)
            .bind(payment.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    /// Persist an escrow-status change with compare-and-swap on the previous
    /// status
    pub async fn update_status(
        &self,
        payment: &Payment,
        expected: crate::domain::entities::PaymentStatus,
    ) -> Result<Payment> {
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
            .fetch_optional(&self.pool)
            .await?;
        require_cas_row(row, "payment", payment.id)
    }
}
