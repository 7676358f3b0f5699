//! Domain layer for the collaboration lifecycle engine

pub mod coordinator;
pub mod entities;
pub mod state;
