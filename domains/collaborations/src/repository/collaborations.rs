//! Collaboration repository

use crate::domain::entities::Collaboration;
use kolab_common::{
    db::{is_unique_violation, require_cas_row},
    Error, Result,
};
use sqlx::PgPool;
use uuid::Uuid;

pub(crate) const COLLABORATION_COLUMNS: &str =
    "id, campaign_id, influencer_id, agreed_price, status, created_at, updated_at";

#[derive(Clone)]
pub struct CollaborationRepository {
    pool: PgPool,
}

impl CollaborationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find collaboration by ID
    pub async fn find(&self, id: Uuid) -> Result<Option<Collaboration>> {
        let query = format!("SELECT {COLLABORATION_COLUMNS} FROM collaborations WHERE id = $1");
        let row = sqlx::query_as::<_, Collaboration>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Find the collaboration for a (campaign, influencer) pair, if any.
    /// At most one exists regardless of status.
    pub async fn find_by_pair(
        &self,
        campaign_id: Uuid,
        influencer_id: Uuid,
    ) -> Result<Option<Collaboration>> {
        let query = format!(
            "SELECT {COLLABORATION_COLUMNS} FROM collaborations \
             WHERE campaign_id = $1 AND influencer_id = $2"
        );
        let row = sqlx::query_as::<_, Collaboration>(&query)
            .bind(campaign_id)
            .bind(influencer_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// List collaborations, optionally filtered by campaign or influencer
    pub async fn list(
        &self,
        campaign_id: Option<Uuid>,
        influencer_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Collaboration>> {
        let query = format!(
            "SELECT {COLLABORATION_COLUMNS} FROM collaborations \
             WHERE ($1::uuid IS NULL OR campaign_id = $1) \
               AND ($2::uuid IS NULL OR influencer_id = $2) \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4"
        );
        let rows = sqlx::query_as::<_, Collaboration>(&query)
            .bind(campaign_id)
            .bind(influencer_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Create a new collaboration.
    ///
    /// The unique (campaign_id, influencer_id) index backs the duplicate
    /// check: an insert that races past the application-level lookup
    /// surfaces as `Conflict` rather than a database error.
    pub async fn create(&self, collaboration: &Collaboration) -> Result<Collaboration> {
        let query = format!(
            "INSERT INTO collaborations ({COLLABORATION_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLLABORATION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Collaboration>(&query)
            .bind(collaboration.id)
            .bind(collaboration.campaign_id)
            .bind(collaboration.influencer_id)
            .bind(collaboration.agreed_price)
            .bind(collaboration.status)
            .bind(collaboration.created_at)
            .bind(collaboration.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    Error::Conflict(format!(
                        "collaboration already exists for campaign {} and influencer {}",
                        collaboration.campaign_id, collaboration.influencer_id
                    ))
                } else {
                    Error::Database(e)
                }
            })?;
        Ok(row)
    }

    /// Persist a status change with compare-and-swap on the previous status.
    ///
    /// Returns `Conflict` when a concurrent transition won the race; the
    /// stored row is untouched in that case.
    pub async fn update_status(
        &self,
        collaboration: &Collaboration,
        expected: crate::domain::entities::CollaborationStatus,
    ) -> Result<Collaboration> {
        let query = format!(
            "UPDATE collaborations SET status = $2, updated_at = $3 \
             WHERE id = $1 AND status = $4 \
             RETURNING {COLLABORATION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Collaboration>(&query)
            .bind(collaboration.id)
            .bind(collaboration.status)
            .bind(collaboration.updated_at)
            .bind(expected)
            .fetch_optional(&self.pool)
            .await?;
        require_cas_row(row, "collaboration", collaboration.id)
    }
}
