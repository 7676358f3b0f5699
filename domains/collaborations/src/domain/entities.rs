//! Lifecycle domain entities
//!
//! Each entity owns its creation validation and mutates its status only
//! through the transition tables in [`crate::domain::state`]. Every rejected
//! mutation leaves the entity untouched; callers persist the whole row (or
//! nothing) after a successful mutation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use kolab_common::{Error, Result, StateError};

use crate::domain::state::{
    CollaborationState, CollaborationStateMachine, DeliverableState, DeliverableStateMachine,
    DisputeProcess, DisputeState, PaymentState, PaymentStateMachine, TransitionTable,
};

fn state_error(e: StateError) -> Error {
    // Leaving a terminal state is an explicit-transition failure too
    Error::InvalidTransition(e.to_string())
}

// ============================================================================
// Collaboration
// ============================================================================

/// Collaboration status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "collaboration_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CollaborationStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
    InProgress,
    Completed,
    Cancelled,
}

impl CollaborationStatus {
    pub fn is_terminal(&self) -> bool {
        self.to_state().is_terminal()
    }

    pub fn to_state(&self) -> CollaborationState {
        match self {
            Self::Pending => CollaborationState::Pending,
            Self::Accepted => CollaborationState::Accepted,
            Self::Declined => CollaborationState::Declined,
            Self::InProgress => CollaborationState::InProgress,
            Self::Completed => CollaborationState::Completed,
            Self::Cancelled => CollaborationState::Cancelled,
        }
    }

    pub fn from_state(state: CollaborationState) -> Self {
        match state {
            CollaborationState::Pending => Self::Pending,
            CollaborationState::Accepted => Self::Accepted,
            CollaborationState::Declined => Self::Declined,
            CollaborationState::InProgress => Self::InProgress,
            CollaborationState::Completed => Self::Completed,
            CollaborationState::Cancelled => Self::Cancelled,
        }
    }
}

impl std::fmt::Display for CollaborationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_state().fmt(f)
    }
}

/// The agreement between one campaign and one influencer profile.
///
/// At most one collaboration exists per (campaign_id, influencer_id) pair,
/// and `agreed_price` is immutable after creation. Collaborations are never
/// deleted; cancellation is a terminal status, not removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Collaboration {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub influencer_id: Uuid,
    pub agreed_price: Decimal,
    pub status: CollaborationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Collaboration {
    /// Create a new collaboration with validation
    pub fn new(campaign_id: Uuid, influencer_id: Uuid, agreed_price: Decimal) -> Result<Self> {
        if agreed_price <= Decimal::ZERO {
            return Err(Error::Validation(format!(
                "agreed_price must be positive, got {agreed_price}"
            )));
        }

        let now = Utc::now();
        Ok(Collaboration {
            id: Uuid::new_v4(),
            campaign_id,
            influencer_id,
            agreed_price,
            status: CollaborationStatus::default(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Transition to the requested status, leaving the entity unchanged on
    /// rejection
    pub fn transition_to(&mut self, requested: CollaborationStatus) -> Result<()> {
        let next = CollaborationStateMachine::transition(self.status.to_state(), requested.to_state())
            .map_err(state_error)?;
        self.status = CollaborationStatus::from_state(next);
        self.updated_at = Utc::now();
        Ok(())
    }
}

// ============================================================================
// Deliverable
// ============================================================================

/// Deliverable status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "deliverable_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeliverableStatus {
    #[default]
    Pending,
    Submitted,
    Approved,
    RevisionRequested,
    Rejected,
}

impl DeliverableStatus {
    pub fn is_terminal(&self) -> bool {
        self.to_state().is_terminal()
    }

    pub fn to_state(&self) -> DeliverableState {
        match self {
            Self::Pending => DeliverableState::Pending,
            Self::Submitted => DeliverableState::Submitted,
            Self::Approved => DeliverableState::Approved,
            Self::RevisionRequested => DeliverableState::RevisionRequested,
            Self::Rejected => DeliverableState::Rejected,
        }
    }

    pub fn from_state(state: DeliverableState) -> Self {
        match state {
            DeliverableState::Pending => Self::Pending,
            DeliverableState::Submitted => Self::Submitted,
            DeliverableState::Approved => Self::Approved,
            DeliverableState::RevisionRequested => Self::RevisionRequested,
            DeliverableState::Rejected => Self::Rejected,
        }
    }
}

impl std::fmt::Display for DeliverableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_state().fmt(f)
    }
}

/// One unit of submitted work belonging to exactly one collaboration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Deliverable {
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

impl Deliverable {
    /// Create a new deliverable with validation.
    ///
    /// The "collaboration must be accepted or in_progress" precondition is
    /// the coordinator's job; this constructor only validates the payload.
    pub fn new(
        collaboration_id: Uuid,
        title: String,
        description: Option<String>,
        file_url: Option<String>,
    ) -> Result<Self> {
        if title.trim().is_empty() {
            return Err(Error::Validation("title must not be empty".to_string()));
        }

        let now = Utc::now();
        Ok(Deliverable {
            id: Uuid::new_v4(),
            collaboration_id,
            title,
            description,
            file_url,
            status: DeliverableStatus::default(),
            feedback: None,
            submitted_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Advance the review status.
    ///
    /// Entering `submitted` stamps `submitted_at` with the current time,
    /// refreshing it on resubmission after `revision_requested`. Feedback is
    /// stored verbatim whenever supplied, regardless of the new status; when
    /// omitted the previous feedback is preserved.
    pub fn update_status(
        &mut self,
        requested: DeliverableStatus,
        feedback: Option<String>,
    ) -> Result<()> {
        let next = DeliverableStateMachine::transition(self.status.to_state(), requested.to_state())
            .map_err(state_error)?;
        self.status = DeliverableStatus::from_state(next);
        if self.status == DeliverableStatus::Submitted {
            self.submitted_at = Some(Utc::now());
        }
        if let Some(feedback) = feedback {
            self.feedback = Some(feedback);
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Validate invariants: `submitted_at` is null exactly when the
    /// deliverable has never been submitted
    pub fn validate(&self) -> Result<()> {
        match (self.status, self.submitted_at) {
            (DeliverableStatus::Pending, Some(_)) => Err(Error::Validation(
                "pending deliverables must not have a submission timestamp".to_string(),
            )),
            (DeliverableStatus::Pending, None) => Ok(()),
            (_, None) => Err(Error::Validation(
                "deliverables past submission must have a submission timestamp".to_string(),
            )),
            (_, Some(_)) => Ok(()),
        }
    }
}

// ============================================================================
// Payment
// ============================================================================

/// Payment escrow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    InEscrow,
    Released,
    Refunded,
}

impl PaymentStatus {
    pub fn is_terminal(&self) -> bool {
        self.to_state().is_terminal()
    }

    pub fn to_state(&self) -> PaymentState {
        match self {
            Self::Pending => PaymentState::Pending,
            Self::InEscrow => PaymentState::InEscrow,
            Self::Released => PaymentState::Released,
            Self::Refunded => PaymentState::Refunded,
        }
    }

    pub fn from_state(state: PaymentState) -> Self {
        match state {
            PaymentState::Pending => Self::Pending,
            PaymentState::InEscrow => Self::InEscrow,
            PaymentState::Released => Self::Released,
            PaymentState::Refunded => Self::Refunded,
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_state().fmt(f)
    }
}

/// One escrow transaction paying the influencer of a collaboration.
///
/// A collaboration may accumulate multiple payment records over time; each
/// is tracked independently. `transaction_id` is an opaque external gateway
/// reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub collaboration_id: Uuid,
    pub amount: Decimal,
    pub platform_commission: Decimal,
    pub influencer_payout: Decimal,
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Create a new payment, enforcing the commission arithmetic:
    /// amount = platform_commission + influencer_payout
    pub fn new(
        collaboration_id: Uuid,
        amount: Decimal,
        platform_commission: Decimal,
        influencer_payout: Decimal,
    ) -> Result<Self> {
        if amount <= Decimal::ZERO {
            return Err(Error::Validation(format!(
                "amount must be positive, got {amount}"
            )));
        }
        if platform_commission < Decimal::ZERO || influencer_payout < Decimal::ZERO {
            return Err(Error::Validation(
                "platform_commission and influencer_payout must not be negative".to_string(),
            ));
        }
        // checked_add: a component sum that overflows Decimal can never
        // equal a valid amount, so it reports as a mismatch
        if platform_commission.checked_add(influencer_payout) != Some(amount) {
            return Err(Error::Validation(format!(
                "amount {amount} does not equal platform_commission {platform_commission} \
                 plus influencer_payout {influencer_payout}"
            )));
        }

        let now = Utc::now();
        Ok(Payment {
            id: Uuid::new_v4(),
            collaboration_id,
            amount,
            platform_commission,
            influencer_payout,
            status: PaymentStatus::default(),
            transaction_id: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Advance the escrow status.
    ///
    /// A supplied `transaction_id` replaces the stored value; when omitted
    /// the stored value is preserved unchanged (partial update, not
    /// reset-to-null). The cross-entity "release requires a completed
    /// collaboration" guard is the coordinator's job.
    pub fn update_status(
        &mut self,
        requested: PaymentStatus,
        transaction_id: Option<String>,
    ) -> Result<()> {
        let next = PaymentStateMachine::transition(self.status.to_state(), requested.to_state())
            .map_err(state_error)?;
        self.status = PaymentStatus::from_state(next);
        if let Some(transaction_id) = transaction_id {
            self.transaction_id = Some(transaction_id);
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Validate the commission arithmetic invariant
    pub fn validate(&self) -> Result<()> {
        if self.platform_commission.checked_add(self.influencer_payout) != Some(self.amount) {
            return Err(Error::Validation(
                "payment amount must equal platform_commission plus influencer_payout".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Dispute
// ============================================================================

/// Dispute status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "dispute_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DisputeStatus {
    #[default]
    Open,
    InReview,
    Resolved,
    Closed,
}

impl DisputeStatus {
    pub fn is_terminal(&self) -> bool {
        self.to_state().is_terminal()
    }

    pub fn to_state(&self) -> DisputeState {
        match self {
            Self::Open => DisputeState::Open,
            Self::InReview => DisputeState::InReview,
            Self::Resolved => DisputeState::Resolved,
            Self::Closed => DisputeState::Closed,
        }
    }

    pub fn from_state(state: DisputeState) -> Self {
        match state {
            DisputeState::Open => Self::Open,
            DisputeState::InReview => Self::InReview,
            DisputeState::Resolved => Self::Resolved,
            DisputeState::Closed => Self::Closed,
        }
    }
}

impl std::fmt::Display for DisputeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_state().fmt(f)
    }
}

/// An out-of-band disagreement record raised against a collaboration.
///
/// `initiated_by` must resolve to one of the two collaboration participants
/// (the campaign's brand owner or the influencer); the coordinator performs
/// that check. Multiple disputes may exist per collaboration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Dispute {
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

impl Dispute {
    /// Open a new dispute with validation
    pub fn new(
        collaboration_id: Uuid,
        initiated_by: Uuid,
        subject: String,
        description: String,
    ) -> Result<Self> {
        if subject.trim().is_empty() {
            return Err(Error::Validation("subject must not be empty".to_string()));
        }

        let now = Utc::now();
        Ok(Dispute {
            id: Uuid::new_v4(),
            collaboration_id,
            initiated_by,
            subject,
            description,
            status: DisputeStatus::default(),
            resolution: None,
            resolved_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Move the dispute to `in_review` or `closed`.
    ///
    /// `resolved_at` is stamped on entry to either terminal state.
    pub fn transition_to(&mut self, requested: DisputeStatus) -> Result<()> {
        let next = DisputeProcess::transition(self.status.to_state(), requested.to_state())
            .map_err(state_error)?;
        self.status = DisputeStatus::from_state(next);
        if self.status.is_terminal() {
            self.resolved_at = Some(Utc::now());
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Resolve the dispute, recording the resolution text
    pub fn resolve(&mut self, resolution: String) -> Result<()> {
        self.transition_to(DisputeStatus::Resolved)?;
        self.resolution = Some(resolution);
        Ok(())
    }
}
