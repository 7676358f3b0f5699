//! Collaboration lifecycle domain: collaborations, deliverables, payments, disputes

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use api::{routes, CollaborationsState};
pub use domain::coordinator::{self, LifecycleEvent};
pub use domain::entities::*;
pub use domain::state::{
    CollaborationState, CollaborationStateMachine, DeliverableState, DeliverableStateMachine,
    DisputeProcess, DisputeState, PaymentState, PaymentStateMachine, TransitionTable,
};
pub use repository::CollaborationsRepositories;
