//! End-to-end lifecycle scenarios at the domain level
//!
//! These exercise the state machines, entity mutations, and coordinator
//! guards together, the same way the HTTP handlers drive them.

use rust_decimal_macros::dec;
use uuid::Uuid;

use kolab_collaborations::{
    coordinator, Collaboration, CollaborationStatus, Deliverable, DeliverableStatus, Dispute,
    Payment, PaymentStatus,
};
use kolab_common::Error;

/// Accept a collaboration, then try to complete it without passing through
/// in_progress
#[test]
fn scenario_collaboration_cannot_skip_in_progress() {
    let mut collab = Collaboration::new(Uuid::new_v4(), Uuid::new_v4(), dec!(1500.50)).unwrap();
    assert_eq!(collab.status, CollaborationStatus::Pending);
    assert_eq!(collab.agreed_price, dec!(1500.50));

    collab.transition_to(CollaborationStatus::Accepted).unwrap();
    assert_eq!(collab.status, CollaborationStatus::Accepted);

    let err = collab
        .transition_to(CollaborationStatus::Completed)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidTransition(_)));
    assert_eq!(collab.status, CollaborationStatus::Accepted);
}

/// Campaign must be active before a collaboration can be created against it
#[test]
fn scenario_draft_campaign_rejects_collaboration() {
    let campaign_id = Uuid::new_v4();
    let err = coordinator::ensure_campaign_active(campaign_id, "draft").unwrap_err();
    assert!(matches!(err, Error::InvalidState(_)));
}

/// A second collaboration for the same (campaign, influencer) pair conflicts
/// no matter how far the first one has progressed
#[test]
fn scenario_duplicate_pair_conflicts_even_after_terminal_status() {
    let campaign_id = Uuid::new_v4();
    let influencer_id = Uuid::new_v4();
    let mut existing = Collaboration::new(campaign_id, influencer_id, dec!(300)).unwrap();

    let err = coordinator::ensure_pair_available(campaign_id, influencer_id, Some(&existing))
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    existing.transition_to(CollaborationStatus::Declined).unwrap();
    assert!(existing.status.is_terminal());
    let err = coordinator::ensure_pair_available(campaign_id, influencer_id, Some(&existing))
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    // A different influencer for the same campaign is fine
    coordinator::ensure_pair_available(campaign_id, Uuid::new_v4(), None).unwrap();
}

/// Deliverable creation is gated on the collaboration being accepted or in
/// progress
#[test]
fn scenario_deliverable_gated_on_collaboration_status() {
    let mut collab = Collaboration::new(Uuid::new_v4(), Uuid::new_v4(), dec!(800)).unwrap();

    let err = coordinator::ensure_deliverable_creation_allowed(&collab).unwrap_err();
    assert!(matches!(err, Error::InvalidState(_)));
    assert!(err.to_string().contains("pending"));

    collab.transition_to(CollaborationStatus::Accepted).unwrap();
    coordinator::ensure_deliverable_creation_allowed(&collab).unwrap();

    let deliverable =
        Deliverable::new(collab.id, "TikTok video".to_string(), None, None).unwrap();
    assert_eq!(deliverable.status, DeliverableStatus::Pending);
    assert!(deliverable.submitted_at.is_none());
}

/// Submission timestamps: set on submit, untouched by revision requests,
/// refreshed on resubmission
#[test]
fn scenario_deliverable_review_round_trip() {
    let mut d = Deliverable::new(Uuid::new_v4(), "YouTube integration".to_string(), None, None)
        .unwrap();

    d.update_status(DeliverableStatus::Submitted, None).unwrap();
    let first = d.submitted_at.unwrap();

    d.update_status(
        DeliverableStatus::RevisionRequested,
        Some("fix X".to_string()),
    )
    .unwrap();
    assert_eq!(d.feedback.as_deref(), Some("fix X"));
    assert_eq!(d.submitted_at, Some(first));

    d.update_status(DeliverableStatus::Submitted, None).unwrap();
    assert!(d.submitted_at.unwrap() >= first);

    d.update_status(DeliverableStatus::Approved, None).unwrap();
    assert!(d.is_terminal());
    d.validate().unwrap();
}

/// Payment release is blocked until the collaboration completes
#[test]
fn scenario_payment_release_requires_completion() {
    let mut collab = Collaboration::new(Uuid::new_v4(), Uuid::new_v4(), dec!(500)).unwrap();
    let mut payment = Payment::new(collab.id, dec!(500), dec!(50), dec!(450)).unwrap();

    payment
        .update_status(PaymentStatus::InEscrow, Some("txn_abc".to_string()))
        .unwrap();

    // The collaboration is still pending, so release is rejected before the
    // payment machine is even consulted
    let err = coordinator::ensure_payment_transition_allowed(PaymentStatus::Released, collab.status)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidState(_)));

    collab.transition_to(CollaborationStatus::Accepted).unwrap();
    collab
        .transition_to(CollaborationStatus::InProgress)
        .unwrap();
    collab.transition_to(CollaborationStatus::Completed).unwrap();

    coordinator::ensure_payment_transition_allowed(PaymentStatus::Released, collab.status).unwrap();
    payment.update_status(PaymentStatus::Released, None).unwrap();
    assert_eq!(payment.transaction_id.as_deref(), Some("txn_abc"));
    assert!(payment.is_terminal());
}

/// Non-participants cannot open disputes; participants can, at any point
#[test]
fn scenario_dispute_participant_authorization() {
    let brand_owner = Uuid::new_v4();
    let influencer = Uuid::new_v4();
    let stranger = Uuid::new_v4();

    let err = coordinator::ensure_dispute_participant(
        stranger,
        Some(brand_owner),
        Some(influencer),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Forbidden(_)));

    coordinator::ensure_dispute_participant(influencer, Some(brand_owner), Some(influencer))
        .unwrap();

    let mut dispute = Dispute::new(
        Uuid::new_v4(),
        influencer,
        "payment delayed".to_string(),
        "escrow release is overdue".to_string(),
    )
    .unwrap();
    dispute.resolve("released manually".to_string()).unwrap();
    assert!(dispute.resolved_at.is_some());
}

/// The completion event fires exactly on the in_progress -> completed edge
#[test]
fn scenario_completion_event() {
    let mut collab = Collaboration::new(Uuid::new_v4(), Uuid::new_v4(), dec!(250)).unwrap();

    collab.transition_to(CollaborationStatus::Accepted).unwrap();
    assert!(coordinator::lifecycle_event(
        collab.id,
        CollaborationStatus::Pending,
        collab.status
    )
    .is_none());

    collab
        .transition_to(CollaborationStatus::InProgress)
        .unwrap();
    collab.transition_to(CollaborationStatus::Completed).unwrap();
    let event = coordinator::lifecycle_event(
        collab.id,
        CollaborationStatus::InProgress,
        collab.status,
    );
    assert_eq!(
        event,
        Some(coordinator::LifecycleEvent::CollaborationCompleted {
            collaboration_id: collab.id
        })
    );
}
