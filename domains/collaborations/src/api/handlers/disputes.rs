//! Dispute API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use kolab_common::{Error, Pagination, Result, ValidatedJson};

use crate::api::middleware::CollaborationsState;
use crate::domain::coordinator;
use crate::domain::entities::{Dispute, DisputeStatus};

/// Dispute response DTO
#[derive(Debug, Serialize)]
pub struct DisputeResponse {
    pub id: Uuid,
    pub collaboration_id: Uuid,
    pub initiated_by: Uuid,
    pub subject: String,
    pub description: String,
    pub status: DisputeStatus,
    pub resolution: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Dispute> for DisputeResponse {
    fn from(d: Dispute) -> Self {
        Self {
            id: d.id,
            collaboration_id: d.collaboration_id,
            initiated_by: d.initiated_by,
            subject: d.subject,
            description: d.description,
            status: d.status,
            resolution: d.resolution,
            resolved_at: d.resolved_at,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

/// Request for opening a dispute
#[derive(Debug, Deserialize, Validate)]
pub struct OpenDisputeRequest {
    pub initiated_by: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub subject: String,
    pub description: String,
}

/// Request for moving a dispute to `in_review` or `closed`
#[derive(Debug, Deserialize)]
pub struct UpdateDisputeStatusRequest {
    pub status: DisputeStatus,
}

/// Request for resolving a dispute
#[derive(Debug, Deserialize, Validate)]
pub struct ResolveDisputeRequest {
    #[validate(length(min = 1))]
    pub resolution: String,
}

/// Open a dispute against a collaboration.
///
/// Only the collaboration's participants (the campaign's brand owner or the
/// influencer) may open one; anyone else is rejected.
pub async fn open_dispute(
    State(state): State<CollaborationsState>,
    Path(collaboration_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<OpenDisputeRequest>,
) -> Result<(StatusCode, Json<DisputeResponse>)> {
    let collaboration = state
        .repos
        .collaborations
        .find(collaboration_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("collaboration {collaboration_id} not found")))?;

    // Resolve both participants through the out-of-scope profile domains
    let brand_owner = match state
        .repos
        .directory
        .get_campaign(collaboration.campaign_id)
        .await?
    {
        Some(campaign) => state.repos.directory.brand_owner(campaign.brand_id).await?,
        None => None,
    };
    let influencer_user = state
        .repos
        .directory
        .influencer_user(collaboration.influencer_id)
        .await?;
    coordinator::ensure_dispute_participant(req.initiated_by, brand_owner, influencer_user)?;

    let dispute = Dispute::new(
        collaboration_id,
        req.initiated_by,
        req.subject,
        req.description,
    )?;
    let created = state.repos.disputes.create(&dispute).await?;

    tracing::info!(
        dispute_id = %created.id,
        collaboration_id = %collaboration_id,
        initiated_by = %created.initiated_by,
        "dispute opened"
    );
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Get a single dispute by ID
pub async fn get_dispute(
    State(state): State<CollaborationsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DisputeResponse>> {
    let dispute = state
        .repos
        .disputes
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("dispute {id} not found")))?;
    Ok(Json(dispute.into()))
}

/// List disputes for a collaboration
pub async fn list_disputes(
    State(state): State<CollaborationsState>,
    Path(collaboration_id): Path<Uuid>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<DisputeResponse>>> {
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

    let disputes = state
        .repos
        .disputes
        .list_by_collaboration(collaboration_id, page.limit(), page.offset())
        .await?;
    Ok(Json(disputes.into_iter().map(Into::into).collect()))
}

/// Move a dispute to `in_review` or `closed`.
///
/// Resolution goes through the resolve endpoint because it must carry the
/// resolution text.
pub async fn update_dispute_status(
    State(state): State<CollaborationsState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateDisputeStatusRequest>,
) -> Result<Json<DisputeResponse>> {
    if req.status == DisputeStatus::Resolved {
        return Err(Error::Validation(
            "resolving a dispute requires a resolution; use the resolve endpoint".to_string(),
        ));
    }

    let mut dispute = state
        .repos
        .disputes
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("dispute {id} not found")))?;

    let previous = dispute.status;
    dispute.transition_to(req.status)?;
    let updated = state.repos.disputes.update_status(&dispute, previous).await?;

    tracing::info!(
        dispute_id = %updated.id,
        from = %previous,
        to = %updated.status,
        "dispute status updated"
    );
    Ok(Json(updated.into()))
}

/// Resolve a dispute, recording the resolution text
pub async fn resolve_dispute(
    State(state): State<CollaborationsState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<ResolveDisputeRequest>,
) -> Result<Json<DisputeResponse>> {
    let mut dispute = state
        .repos
        .disputes
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("dispute {id} not found")))?;

    let previous = dispute.status;
    dispute.resolve(req.resolution)?;
    let updated = state.repos.disputes.update_status(&dispute, previous).await?;

    tracing::info!(dispute_id = %updated.id, "dispute resolved");
    Ok(Json(updated.into()))
}
