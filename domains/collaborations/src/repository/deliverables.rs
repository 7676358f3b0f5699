//! Deliverable repository
//!
//! Deliverable creation lives in `transactions.rs` because it must hold the
//! parent collaboration's row lock while inserting.

use crate::domain::entities::{Deliverable, DeliverableStatus};
use kolab_common::{db::require_cas_row, Result};
use sqlx::PgPool;
use uuid::Uuid;

pub(crate) const DELIVERABLE_COLUMNS: &str = "id, collaboration_id, title, description, \
     file_url, status, feedback, submitted_at, created_at, updated_at";

#[derive(Clone)]
pub struct DeliverableRepository {
    pool: PgPool,
}

impl DeliverableRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find deliverable by ID
    pub async fn find(&self, id: Uuid) -> Result<Option<Deliverable>> {
        let query = format!("SELECT {DELIVERABLE_COLUMNS} FROM deliverables WHERE id = $1");
        let row = sqlx::query_as::<_, Deliverable>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// List deliverables for a collaboration
    pub async fn list_by_collaboration(
        &self,
        collaboration_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Deliverable>> {
        let query = format!(
            "SELECT {DELIVERABLE_COLUMNS} FROM deliverables \
             WHERE collaboration_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, Deliverable>(&query)
            .bind(collaboration_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Persist a review-status change with compare-and-swap on the previous
    /// status
    pub async fn update_status(
        &self,
        deliverable: &Deliverable,
        expected: DeliverableStatus,
    ) -> Result<Deliverable> {
        let query = format!(
            "UPDATE deliverables SET \
                status = $2, feedback = $3, submitted_at = $4, updated_at = $5 \
             WHERE id = $1 AND status = $6 \
             RETURNING {DELIVERABLE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Deliverable>(&query)
            .bind(deliverable.id)
            .bind(deliverable.status)
            .bind(&deliverable.feedback)
            .bind(deliverable.submitted_at)
            .bind(deliverable.updated_at)
            .bind(expected)
            .fetch_optional(&self.pool)
            .await?;
        require_cas_row(row, "deliverable", deliverable.id)
    }
}
