//! Collaboration lifecycle domain state

use crate::CollaborationsRepositories;

/// Application state for the collaboration lifecycle domain
///
/// Authentication is handled by the upstream gateway; the engine itself only
/// needs repository access.
#[derive(Clone)]
pub struct CollaborationsState {
    pub repos: CollaborationsRepositories,
}
