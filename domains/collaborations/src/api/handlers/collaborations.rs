//! Collaboration API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use kolab_common::{Error, Pagination, Result};

use crate::api::middleware::CollaborationsState;
use crate::domain::coordinator;
use crate::domain::entities::{Collaboration, CollaborationStatus};

/// Collaboration response DTO
#[derive(Debug, Serialize)]
pub struct CollaborationResponse {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub influencer_id: Uuid,
    pub agreed_price: Decimal,
    pub status: CollaborationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Collaboration> for CollaborationResponse {
    fn from(c: Collaboration) -> Self {
        Self {
            id: c.id,
            campaign_id: c.campaign_id,
            influencer_id: c.influencer_id,
            agreed_price: c.agreed_price,
            status: c.status,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Request for creating a collaboration
#[derive(Debug, Deserialize)]
pub struct CreateCollaborationRequest {
    pub campaign_id: Uuid,
    pub influencer_id: Uuid,
    pub agreed_price: Decimal,
}

/// Request for updating a collaboration's status
#[derive(Debug, Deserialize)]
pub struct UpdateCollaborationStatusRequest {
    pub status: CollaborationStatus,
}

/// Filter parameters for listing collaborations
#[derive(Debug, Deserialize)]
pub struct ListCollaborationsParams {
    pub campaign_id: Option<Uuid>,
    pub influencer_id: Option<Uuid>,
}

/// Create a collaboration between an active campaign and an influencer
pub async fn create_collaboration(
    State(state): State<CollaborationsState>,
    Json(req): Json<CreateCollaborationRequest>,
) -> Result<(StatusCode, Json<CollaborationResponse>)> {
    let campaign = state
        .repos
        .directory
        .get_campaign(req.campaign_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("campaign {} not found", req.campaign_id)))?;
    coordinator::ensure_campaign_active(campaign.id, &campaign.status)?;

    if !state
        .repos
        .directory
        .influencer_exists(req.influencer_id)
        .await?
    {
        return Err(Error::NotFound(format!(
            "influencer profile {} not found",
            req.influencer_id
        )));
    }

    let existing = state
        .repos
        .collaborations
        .find_by_pair(req.campaign_id, req.influencer_id)
        .await?;
    coordinator::ensure_pair_available(req.campaign_id, req.influencer_id, existing.as_ref())?;

    let collaboration = Collaboration::new(req.campaign_id, req.influencer_id, req.agreed_price)?;
    let created = state.repos.collaborations.create(&collaboration).await?;

    tracing::info!(
        collaboration_id = %created.id,
        campaign_id = %created.campaign_id,
        influencer_id = %created.influencer_id,
        "collaboration created"
    );
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Get a single collaboration by ID
pub async fn get_collaboration(
    State(state): State<CollaborationsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CollaborationResponse>> {
    let collaboration = state
        .repos
        .collaborations
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("collaboration {id} not found")))?;
    Ok(Json(collaboration.into()))
}

/// List collaborations, optionally filtered by campaign or influencer
pub async fn list_collaborations(
    State(state): State<CollaborationsState>,
    Query(params): Query<ListCollaborationsParams>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<CollaborationResponse>>> {
    let collaborations = state
        .repos
        .collaborations
        .list(
            params.campaign_id,
            params.influencer_id,
            page.limit(),
            page.offset(),
        )
        .await?;
    Ok(Json(collaborations.into_iter().map(Into::into).collect()))
}

/// Transition a collaboration to a new status
pub async fn update_collaboration_status(
    State(state): State<CollaborationsState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCollaborationStatusRequest>,
) -> Result<Json<CollaborationResponse>> {
    let mut collaboration = state
        .repos
        .collaborations
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("collaboration {id} not found")))?;

    let previous = collaboration.status;
    collaboration.transition_to(req.status)?;
    let updated = state
        .repos
        .collaborations
        .update_status(&collaboration, previous)
        .await?;

    if let Some(event) = coordinator::lifecycle_event(updated.id, previous, updated.status) {
        // Downstream effects (review enablement, profile aggregates) are
        // best-effort notifications consumed outside the engine.
        tracing::info!(?event, "collaboration lifecycle event");
    }

    tracing::info!(
        collaboration_id = %updated.id,
        from = %previous,
        to = %updated.status,
        "collaboration status updated"
    );
    Ok(Json(updated.into()))
}
