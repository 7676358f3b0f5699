//! Lifecycle coordinator: cross-entity preconditions
//!
//! Rules that span more than one state machine live here as pure guards.
//! Handlers evaluate them inside the same database transaction as the write
//! they protect, so the parent collaboration's status cannot change between
//! the check and the commit.

use uuid::Uuid;

use kolab_common::{Error, Result};

use crate::domain::entities::{Collaboration, CollaborationStatus, PaymentStatus};

/// Campaign status required for collaboration creation
const CAMPAIGN_ACTIVE: &str = "active";

/// Business events the coordinator surfaces for downstream consumers
/// (e.g. enabling reviews once a collaboration completes). Delivery is
/// best-effort and asynchronous; the engine only exposes the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    CollaborationCompleted { collaboration_id: Uuid },
}

/// A collaboration may only be created against an active campaign
pub fn ensure_campaign_active(campaign_id: Uuid, campaign_status: &str) -> Result<()> {
    if campaign_status != CAMPAIGN_ACTIVE {
        return Err(Error::InvalidState(format!(
            "cannot create collaboration for campaign {campaign_id} in {campaign_status} status"
        )));
    }
    Ok(())
}

/// A (campaign, influencer) pair admits at most one collaboration, ever.
/// An existing row blocks a new one whatever its status, terminal included;
/// the unique index on the pair backs this against insert races.
pub fn ensure_pair_available(
    campaign_id: Uuid,
    influencer_id: Uuid,
    existing: Option<&Collaboration>,
) -> Result<()> {
    if existing.is_some() {
        return Err(Error::Conflict(format!(
            "collaboration already exists for campaign {campaign_id} and influencer {influencer_id}"
        )));
    }
    Ok(())
}

/// Deliverables may only be created while the collaboration is accepted or
/// in progress
pub fn ensure_deliverable_creation_allowed(collaboration: &Collaboration) -> Result<()> {
    match collaboration.status {
        CollaborationStatus::Accepted | CollaborationStatus::InProgress => Ok(()),
        status => Err(Error::InvalidState(format!(
            "cannot create deliverable for collaboration in {status} status"
        ))),
    }
}

/// Payment release requires the collaboration to have completed; every other
/// payment transition is independent of the parent's status
pub fn ensure_payment_transition_allowed(
    requested: PaymentStatus,
    collaboration_status: CollaborationStatus,
) -> Result<()> {
    if requested == PaymentStatus::Released
        && collaboration_status != CollaborationStatus::Completed
    {
        return Err(Error::InvalidState(format!(
            "cannot release payment while collaboration is in {collaboration_status} status"
        )));
    }
    Ok(())
}

/// A dispute may only be opened by one of the collaboration's participants:
/// the campaign's brand owner or the influencer
pub fn ensure_dispute_participant(
    initiated_by: Uuid,
    brand_owner: Option<Uuid>,
    influencer_user: Option<Uuid>,
) -> Result<()> {
    if brand_owner == Some(initiated_by) || influencer_user == Some(initiated_by) {
        return Ok(());
    }
    Err(Error::Forbidden(format!(
        "user {initiated_by} is not a participant of this collaboration"
    )))
}

/// Event emitted when a collaboration status change crosses a business
/// boundary worth broadcasting
pub fn lifecycle_event(
    collaboration_id: Uuid,
    previous: CollaborationStatus,
    current: CollaborationStatus,
) -> Option<LifecycleEvent> {
    if previous != CollaborationStatus::Completed && current == CollaborationStatus::Completed {
        return Some(LifecycleEvent::CollaborationCompleted { collaboration_id });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn collaboration_in(status: CollaborationStatus) -> Collaboration {
        let mut c = Collaboration::new(Uuid::new_v4(), Uuid::new_v4(), dec!(100)).unwrap();
        c.status = status;
        c
    }

    #[test]
    fn test_campaign_must_be_active() {
        let id = Uuid::new_v4();
        assert!(ensure_campaign_active(id, "active").is_ok());

        let err = ensure_campaign_active(id, "draft").unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
        assert!(err.to_string().contains("draft"));

        assert!(ensure_campaign_active(id, "completed").is_err());
    }

    #[test]
    fn test_duplicate_pair_rejected_regardless_of_status() {
        let campaign_id = Uuid::new_v4();
        let influencer_id = Uuid::new_v4();

        assert!(ensure_pair_available(campaign_id, influencer_id, None).is_ok());

        for status in [
            CollaborationStatus::Pending,
            CollaborationStatus::Accepted,
            CollaborationStatus::Declined,
            CollaborationStatus::InProgress,
            CollaborationStatus::Completed,
            CollaborationStatus::Cancelled,
        ] {
            let existing = collaboration_in(status);
            let err = ensure_pair_available(campaign_id, influencer_id, Some(&existing))
                .unwrap_err();
            assert!(
                matches!(err, Error::Conflict(_)),
                "existing {status} collaboration must block the pair"
            );
        }
    }

    #[test]
    fn test_deliverable_creation_gate() {
        for status in [
            CollaborationStatus::Accepted,
            CollaborationStatus::InProgress,
        ] {
            assert!(ensure_deliverable_creation_allowed(&collaboration_in(status)).is_ok());
        }
        for status in [
            CollaborationStatus::Pending,
            CollaborationStatus::Declined,
            CollaborationStatus::Completed,
            CollaborationStatus::Cancelled,
        ] {
            let err =
                ensure_deliverable_creation_allowed(&collaboration_in(status)).unwrap_err();
            assert!(matches!(err, Error::InvalidState(_)));
            assert!(
                err.to_string().contains(&status.to_string()),
                "error must name the current status"
            );
        }
    }

    #[test]
    fn test_payment_release_requires_completed_collaboration() {
        for status in [
            CollaborationStatus::Pending,
            CollaborationStatus::Accepted,
            CollaborationStatus::InProgress,
            CollaborationStatus::Cancelled,
        ] {
            let err =
                ensure_payment_transition_allowed(PaymentStatus::Released, status).unwrap_err();
            assert!(matches!(err, Error::InvalidState(_)));
        }
        assert!(ensure_payment_transition_allowed(
            PaymentStatus::Released,
            CollaborationStatus::Completed
        )
        .is_ok());
    }

    #[test]
    fn test_non_release_payment_transitions_ignore_parent() {
        for requested in [
            PaymentStatus::InEscrow,
            PaymentStatus::Refunded,
        ] {
            assert!(ensure_payment_transition_allowed(
                requested,
                CollaborationStatus::Pending
            )
            .is_ok());
        }
    }

    #[test]
    fn test_dispute_participants() {
        let brand_owner = Uuid::new_v4();
        let influencer = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        assert!(
            ensure_dispute_participant(brand_owner, Some(brand_owner), Some(influencer)).is_ok()
        );
        assert!(
            ensure_dispute_participant(influencer, Some(brand_owner), Some(influencer)).is_ok()
        );

        let err = ensure_dispute_participant(stranger, Some(brand_owner), Some(influencer))
            .unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));

        // Unresolvable participants never authorize anyone
        assert!(ensure_dispute_participant(stranger, None, None).is_err());
    }

    #[test]
    fn test_completion_event_fires_once() {
        let id = Uuid::new_v4();
        assert_eq!(
            lifecycle_event(
                id,
                CollaborationStatus::InProgress,
                CollaborationStatus::Completed
            ),
            Some(LifecycleEvent::CollaborationCompleted {
                collaboration_id: id
            })
        );
        assert_eq!(
            lifecycle_event(
                id,
                CollaborationStatus::Accepted,
                CollaborationStatus::InProgress
            ),
            None
        );
        assert_eq!(
            lifecycle_event(
                id,
                CollaborationStatus::InProgress,
                CollaborationStatus::Cancelled
            ),
            None
        );
    }
}
