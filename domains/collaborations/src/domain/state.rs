//! State machines for the collaboration lifecycle
//!
//! Each entity's legal status transitions are a fixed, declarative table:
//! the set of successor states reachable from each state. A state with no
//! successors is terminal. Transitions are requested by target state (the
//! API is "move this entity to status X"), so legality is membership of the
//! requested state in the current state's successor list.

use kolab_common::StateError;

/// Declarative transition table shared by all lifecycle entities.
///
/// Implementors list the successor states for each state; everything else
/// (terminality, transition checking) is derived from that table, so an
/// illegal transition cannot be added without editing the table itself.
pub trait TransitionTable: Copy + PartialEq + std::fmt::Display + Sized + 'static {
    /// Entity kind name used in error messages
    const ENTITY: &'static str;

    /// All valid successor states from this state
    fn valid_transitions(&self) -> &'static [Self];

    /// A state with no successors is terminal
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }

    /// Attempt a transition to `requested`, returning it if legal
    fn try_transition(self, requested: Self) -> Result<Self, StateError> {
        if self.is_terminal() {
            return Err(StateError::TerminalState {
                entity: Self::ENTITY,
                state: self.to_string(),
            });
        }
        if self.valid_transitions().contains(&requested) {
            Ok(requested)
        } else {
            Err(StateError::InvalidTransition {
                entity: Self::ENTITY,
                from: self.to_string(),
                to: requested.to_string(),
            })
        }
    }
}

// ============================================================================
// Collaboration State Machine
// ============================================================================

/// Collaboration lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollaborationState {
    Pending,
    Accepted,
    Declined,
    InProgress,
    Completed,
    Cancelled,
}

impl TransitionTable for CollaborationState {
    const ENTITY: &'static str = "collaboration";

    fn valid_transitions(&self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Accepted, Self::Declined],
            Self::Accepted => &[Self::InProgress, Self::Cancelled],
            Self::InProgress => &[Self::Completed, Self::Cancelled],
            Self::Declined | Self::Completed | Self::Cancelled => &[],
        }
    }
}

impl std::fmt::Display for CollaborationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Accepted => write!(f, "accepted"),
            Self::Declined => write!(f, "declined"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Collaboration state machine
pub struct CollaborationStateMachine;

impl CollaborationStateMachine {
    /// Attempt a transition to the requested state
    pub fn transition(
        current: CollaborationState,
        requested: CollaborationState,
    ) -> Result<CollaborationState, StateError> {
        current.try_transition(requested)
    }
}

// ============================================================================
// Deliverable State Machine
// ============================================================================

/// Deliverable review states
///
/// `revision_requested` loops back to `submitted` so work can be resubmitted
/// until it is approved or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliverableState {
    Pending,
    Submitted,
    Approved,
    RevisionRequested,
    Rejected,
}

impl TransitionTable for DeliverableState {
    const ENTITY: &'static str = "deliverable";

    fn valid_transitions(&self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Submitted],
            Self::Submitted => &[Self::Approved, Self::RevisionRequested, Self::Rejected],
            Self::RevisionRequested => &[Self::Submitted],
            Self::Approved | Self::Rejected => &[],
        }
    }
}

impl std::fmt::Display for DeliverableState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Submitted => write!(f, "submitted"),
            Self::Approved => write!(f, "approved"),
            Self::RevisionRequested => write!(f, "revision_requested"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// Deliverable state machine
pub struct DeliverableStateMachine;

impl DeliverableStateMachine {
    pub fn transition(
        current: DeliverableState,
        requested: DeliverableState,
    ) -> Result<DeliverableState, StateError> {
        current.try_transition(requested)
    }
}

// ============================================================================
// Payment State Machine
// ============================================================================

/// Payment escrow states
///
/// `pending -> refunded` is legal: a payment can be cancelled before funds
/// are held in escrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentState {
    Pending,
    InEscrow,
    Released,
    Refunded,
}

impl TransitionTable for PaymentState {
    const ENTITY: &'static str = "payment";

    fn valid_transitions(&self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::InEscrow, Self::Refunded],
            Self::InEscrow => &[Self::Released, Self::Refunded],
            Self::Released | Self::Refunded => &[],
        }
    }
}

impl std::fmt::Display for PaymentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InEscrow => write!(f, "in_escrow"),
            Self::Released => write!(f, "released"),
            Self::Refunded => write!(f, "refunded"),
        }
    }
}

/// Payment state machine
pub struct PaymentStateMachine;

impl PaymentStateMachine {
    pub fn transition(
        current: PaymentState,
        requested: PaymentState,
    ) -> Result<PaymentState, StateError> {
        current.try_transition(requested)
    }
}

// ============================================================================
// Dispute Process
// ============================================================================

/// Dispute process states
///
/// A dispute may be resolved or closed directly from `open`; `in_review` is
/// the resolver's optional intermediate step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisputeState {
    Open,
    InReview,
    Resolved,
    Closed,
}

impl TransitionTable for DisputeState {
    const ENTITY: &'static str = "dispute";

    fn valid_transitions(&self) -> &'static [Self] {
        match self {
            Self::Open => &[Self::InReview, Self::Resolved, Self::Closed],
            Self::InReview => &[Self::Resolved, Self::Closed],
            Self::Resolved | Self::Closed => &[],
        }
    }
}

impl std::fmt::Display for DisputeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::InReview => write!(f, "in_review"),
            Self::Resolved => write!(f, "resolved"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Dispute process state machine
pub struct DisputeProcess;

impl DisputeProcess {
    pub fn transition(
        current: DisputeState,
        requested: DisputeState,
    ) -> Result<DisputeState, StateError> {
        current.try_transition(requested)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Enumerate the full cross product of states against an explicit
    /// allowlist; everything not on the list must be rejected.
    fn assert_table<S: TransitionTable + std::fmt::Debug>(all: &[S], allowed: &[(S, S)]) {
        for &from in all {
            for &to in all {
                let result = from.try_transition(to);
                if allowed.contains(&(from, to)) {
                    assert_eq!(result, Ok(to), "expected {from} -> {to} to be legal");
                } else {
                    assert!(result.is_err(), "expected {from} -> {to} to be rejected");
                }
            }
        }
    }

    mod collaboration_state_machine {
        use super::*;
        use CollaborationState::*;

        const ALL: &[CollaborationState] =
            &[Pending, Accepted, Declined, InProgress, Completed, Cancelled];

        #[test]
        fn test_full_transition_table() {
            assert_table(
                ALL,
                &[
                    (Pending, Accepted),
                    (Pending, Declined),
                    (Accepted, InProgress),
                    (Accepted, Cancelled),
                    (InProgress, Completed),
                    (InProgress, Cancelled),
                ],
            );
        }

        #[test]
        fn test_cannot_skip_states() {
            assert!(matches!(
                CollaborationStateMachine::transition(Pending, InProgress),
                Err(StateError::InvalidTransition { .. })
            ));
            assert!(matches!(
                CollaborationStateMachine::transition(Pending, Completed),
                Err(StateError::InvalidTransition { .. })
            ));
        }

        #[test]
        fn test_terminal_states() {
            assert!(!Pending.is_terminal());
            assert!(!Accepted.is_terminal());
            assert!(!InProgress.is_terminal());
            assert!(Declined.is_terminal());
            assert!(Completed.is_terminal());
            assert!(Cancelled.is_terminal());
        }

        #[test]
        fn test_terminal_states_cannot_transition() {
            for &terminal in &[Declined, Completed, Cancelled] {
                for &to in ALL {
                    assert!(matches!(
                        CollaborationStateMachine::transition(terminal, to),
                        Err(StateError::TerminalState { .. })
                    ));
                }
            }
        }

        #[test]
        fn test_error_names_offending_states() {
            let err = CollaborationStateMachine::transition(Pending, Completed).unwrap_err();
            let msg = err.to_string();
            assert!(msg.contains("pending"));
            assert!(msg.contains("completed"));
        }
    }

    mod deliverable_state_machine {
        use super::*;
        use DeliverableState::*;

        const ALL: &[DeliverableState] =
            &[Pending, Submitted, Approved, RevisionRequested, Rejected];

        #[test]
        fn test_full_transition_table() {
            assert_table(
                ALL,
                &[
                    (Pending, Submitted),
                    (Submitted, Approved),
                    (Submitted, RevisionRequested),
                    (Submitted, Rejected),
                    (RevisionRequested, Submitted),
                ],
            );
        }

        #[test]
        fn test_resubmission_loop() {
            let s = DeliverableStateMachine::transition(Pending, Submitted).unwrap();
            let s = DeliverableStateMachine::transition(s, RevisionRequested).unwrap();
            let s = DeliverableStateMachine::transition(s, Submitted).unwrap();
            let s = DeliverableStateMachine::transition(s, Approved).unwrap();
            assert!(s.is_terminal());
        }

        #[test]
        fn test_cannot_approve_unsubmitted_work() {
            assert!(matches!(
                DeliverableStateMachine::transition(Pending, Approved),
                Err(StateError::InvalidTransition { .. })
            ));
        }

        #[test]
        fn test_terminal_states() {
            assert!(Approved.is_terminal());
            assert!(Rejected.is_terminal());
            assert!(!RevisionRequested.is_terminal());
        }
    }

    mod payment_state_machine {
        use super::*;
        use PaymentState::*;

        const ALL: &[PaymentState] = &[Pending, InEscrow, Released, Refunded];

        #[test]
        fn test_full_transition_table() {
            assert_table(
                ALL,
                &[
                    (Pending, InEscrow),
                    (Pending, Refunded),
                    (InEscrow, Released),
                    (InEscrow, Refunded),
                ],
            );
        }

        #[test]
        fn test_refund_before_escrow_is_legal() {
            assert_eq!(
                PaymentStateMachine::transition(Pending, Refunded),
                Ok(Refunded)
            );
        }

        #[test]
        fn test_cannot_release_before_escrow() {
            assert!(matches!(
                PaymentStateMachine::transition(Pending, Released),
                Err(StateError::InvalidTransition { .. })
            ));
        }

        #[test]
        fn test_terminal_states_cannot_transition() {
            for &terminal in &[Released, Refunded] {
                for &to in ALL {
                    assert!(matches!(
                        PaymentStateMachine::transition(terminal, to),
                        Err(StateError::TerminalState { .. })
                    ));
                }
            }
        }
    }

    mod dispute_process {
        use super::*;
        use DisputeState::*;

        const ALL: &[DisputeState] = &[Open, InReview, Resolved, Closed];

        #[test]
        fn test_full_transition_table() {
            assert_table(
                ALL,
                &[
                    (Open, InReview),
                    (Open, Resolved),
                    (Open, Closed),
                    (InReview, Resolved),
                    (InReview, Closed),
                ],
            );
        }

        #[test]
        fn test_resolving_closed_dispute_fails() {
            assert!(matches!(
                DisputeProcess::transition(Closed, Resolved),
                Err(StateError::TerminalState { .. })
            ));
        }

        #[test]
        fn test_terminal_states() {
            assert!(Resolved.is_terminal());
            assert!(Closed.is_terminal());
            assert!(!Open.is_terminal());
            assert!(!InReview.is_terminal());
        }
    }

    #[test]
    fn test_display_matches_wire_format() {
        assert_eq!(CollaborationState::InProgress.to_string(), "in_progress");
        assert_eq!(
            DeliverableState::RevisionRequested.to_string(),
            "revision_requested"
        );
        assert_eq!(PaymentState::InEscrow.to_string(), "in_escrow");
        assert_eq!(DisputeState::InReview.to_string(), "in_review");
    }
}
