//! HTTP handlers for the collaboration lifecycle domain

pub mod collaborations;
pub mod deliverables;
pub mod disputes;
pub mod payments;
