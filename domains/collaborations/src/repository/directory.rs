//! Read models for external collaborators
//!
//! Campaigns, influencer profiles, and brand profiles are owned by
//! out-of-scope domains; the lifecycle engine only needs existence, status,
//! and participant-identity lookups. These are read-only cross-domain
//! queries against the same database.

use kolab_common::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// The slice of a campaign the lifecycle engine consumes
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CampaignRef {
    pub id: Uuid,
    pub status: String,
    pub brand_id: Uuid,
}

#[derive(Clone)]
pub struct DirectoryRepository {
    pool: PgPool,
}

impl DirectoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Look up a campaign's status and owning brand
    pub async fn get_campaign(&self, id: Uuid) -> Result<Option<CampaignRef>> {
        let row = sqlx::query_as::<_, CampaignRef>(
            "SELECT id, status, brand_id FROM campaigns WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Check whether an influencer profile exists
    pub async fn influencer_exists(&self, id: Uuid) -> Result<bool> {
        let row = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM influencer_profiles WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Resolve an influencer profile to its user account
    pub async fn influencer_user(&self, id: Uuid) -> Result<Option<Uuid>> {
        let row = sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id FROM influencer_profiles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Resolve a brand profile to its owning user account
    pub async fn brand_owner(&self, brand_id: Uuid) -> Result<Option<Uuid>> {
        let row =
            sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM brand_profiles WHERE id = $1")
                .bind(brand_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row)
    }
}
