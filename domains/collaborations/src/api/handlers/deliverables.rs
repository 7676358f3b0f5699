//! Deliverable API handlers

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
use crate::domain::entities::{Deliverable, DeliverableStatus};
use crate::repository::transactions::{create_deliverable_tx, find_collaboration_for_update};

/// Deliverable response DTO
#[derive(Debug, Serialize)]
pub struct DeliverableResponse {
    pub id: Uuid,
    pub collaboration_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub file_url: Option<String>,
    pub status: DeliverableStatus,
    pub feedback: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Deliverable> for DeliverableResponse {
    fn from(d: Deliverable) -> Self {
        Self {
            id: d.id,
            collaboration_id: d.collaboration_id,
            title: d.title,
            description: d.description,
            file_url: d.file_url,
            status: d.status,
            feedback: d.feedback,
            submitted_at: d.submitted_at,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

/// Request for creating a deliverable
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDeliverableRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub description: Option<String>,
    pub file_url: Option<String>,
}

/// Request for updating a deliverable's review status
#[derive(Debug, Deserialize)]
pub struct UpdateDeliverableStatusRequest {
    pub status: DeliverableStatus,
    pub feedback: Option<String>,
}

/// Create a deliverable under a collaboration.
///
/// The parent collaboration row is locked for the duration of the insert so
/// its status cannot change between the coordinator's check and the commit.
pub async fn create_deliverable(
    State(state): State<CollaborationsState>,
    Path(collaboration_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<CreateDeliverableRequest>,
) -> Result<(StatusCode, Json<DeliverableResponse>)> {
    let mut tx = state.repos.begin().await?;

    let collaboration = find_collaboration_for_update(&mut tx, collaboration_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("collaboration {collaboration_id} not found")))?;
    coordinator::ensure_deliverable_creation_allowed(&collaboration)?;

    let deliverable =
        Deliverable::new(collaboration_id, req.title, req.description, req.file_url)?;
    let created = create_deliverable_tx(&mut tx, &deliverable).await?;
    tx.commit().await?;

    tracing::info!(
        deliverable_id = %created.id,
        collaboration_id = %collaboration_id,
        "deliverable created"
    );
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Get a single deliverable by ID
pub async fn get_deliverable(
    State(state): State<CollaborationsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeliverableResponse>> {
    let deliverable = state
        .repos
        .deliverables
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("deliverable {id} not found")))?;
    Ok(Json(deliverable.into()))
}

/// List deliverables for a collaboration
pub async fn list_deliverables(
    State(state): State<CollaborationsState>,
    Path(collaboration_id): Path<Uuid>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<DeliverableResponse>>> {
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

    let deliverables = state
        .repos
        .deliverables
        .list_by_collaboration(collaboration_id, page.limit(), page.offset())
        .await?;
    Ok(Json(deliverables.into_iter().map(Into::into).collect()))
}

/// Advance a deliverable's review status
pub async fn update_deliverable_status(
    State(state): State<CollaborationsState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateDeliverableStatusRequest>,
) -> Result<Json<DeliverableResponse>> {
    let mut deliverable = state
        .repos
        .deliverables
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("deliverable {id} not found")))?;

    let previous = deliverable.status;
    deliverable.update_status(req.status, req.feedback)?;
    let updated = state
        .repos
        .deliverables
        .update_status(&deliverable, previous)
        .await?;

    tracing::info!(
        deliverable_id = %updated.id,
        from = %previous,
        to = %updated.status,
        "deliverable status updated"
    );
    Ok(Json(updated.into()))
}
