//! API layer for the collaboration lifecycle domain
//!
//! Contains HTTP handlers, routes, and domain state definition.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::CollaborationsState;
pub use routes::routes;
