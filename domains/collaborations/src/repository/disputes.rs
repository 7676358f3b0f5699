//! Dispute repository

use crate::domain::entities::{Dispute, DisputeStatus};
use kolab_common::{db::require_cas_row, Result};
use sqlx::PgPool;
use uuid::Uuid;

pub(crate) const DISPUTE_COLUMNS: &str = "id, collaboration_id, initiated_by, subject, \
     description, status, resolution, resolved_at, created_at, updated_at";

#[derive(Clone)]
pub struct DisputeRepository {
    pool: PgPool,
}

impl DisputeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find dispute by ID
    pub async fn find(&self, id: Uuid) -> Result<Option<Dispute>> {
        let query = format!("SELECT {DISPUTE_COLUMNS} FROM disputes WHERE id = $1");
        let row = sqlx::query_as::<_, Dispute>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// List disputes for a collaboration (multiple open disputes are allowed)
    pub async fn list_by_collaboration(
        &self,
        collaboration_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Dispute>> {
        let query = format!(
            "SELECT {DISPUTE_COLUMNS} FROM disputes \
             WHERE collaboration_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, Dispute>(&query)
            .bind(collaboration_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Create a new dispute
    pub async fn create(&self, dispute: &Dispute) -> Result<Dispute> {
        let query = format!(
            "INSERT INTO disputes ({DISPUTE_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {DISPUTE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Dispute>(&query)
            .bind(dispute.id)
            .bind(dispute.collaboration_id)
            .bind(dispute.initiated_by)
            .bind(&dispute.subject)
            .bind(&dispute.description)
            .bind(dispute.status)
            .bind(&dispute.resolution)
            .bind(dispute.resolved_at)
            .bind(dispute.created_at)
            .bind(dispute.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    /// Persist a dispute-status change (including resolution text and
    /// timestamp) with compare-and-swap on the previous status
    pub async fn update_status(
        &self,
        dispute: &Dispute,
        expected: DisputeStatus,
    ) -> Result<Dispute> {
        let query = format!(
            "UPDATE disputes SET \
                status = $2, resolution = $3, resolved_at = $4, updated_at = $5 \
             WHERE id = $1 AND status = $6 \
             RETURNING {DISPUTE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Dispute>(&query)
            .bind(dispute.id)
            .bind(dispute.status)
            .bind(&dispute.resolution)
            .bind(dispute.resolved_at)
            .bind(dispute.updated_at)
            .bind(expected)
            .fetch_optional(&self.pool)
            .await?;
        require_cas_row(row, "dispute", dispute.id)
    }
}
