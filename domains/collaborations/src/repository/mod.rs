//! Repository implementations for the collaboration lifecycle domain

pub mod collaborations;
pub mod deliverables;
pub mod directory;
pub mod disputes;
pub mod payments;
pub mod transactions;

use sqlx::{PgPool, Postgres, Transaction};

pub use collaborations::CollaborationRepository;
pub use deliverables::DeliverableRepository;
pub use directory::{CampaignRef, DirectoryRepository};
pub use disputes::DisputeRepository;
pub use payments::PaymentRepository;

/// Combined repository access for the collaboration lifecycle domain
#[derive(Clone)]
pub struct CollaborationsRepositories {
    pool: PgPool,
    pub collaborations: CollaborationRepository,
    pub deliverables: DeliverableRepository,
    pub payments: PaymentRepository,
    pub disputes: DisputeRepository,
    pub directory: DirectoryRepository,
}

impl CollaborationsRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            collaborations: CollaborationRepository::new(pool.clone()),
            deliverables: DeliverableRepository::new(pool.clone()),
            payments: PaymentRepository::new(pool.clone()),
            disputes: DisputeRepository::new(pool.clone()),
            directory: DirectoryRepository::new(pool.clone()),
            pool,
        }
    }

    /// Begin a new database transaction.
    pub async fn begin(&self) -> std::result::Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Get a reference to the underlying database pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
