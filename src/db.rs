pub mod options;
pub mod transaction;

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{debug, info};

use crate::errors::{DbFailure, StepError};
use crate::seed::fixtures::Fixtures;
use crate::seed::tables::{self, SeedReport};

pub use options::{ConnectionOptions, SslMode};
pub use transaction::transaction_scope;

/// Opens a connection for one seeding run
#[async_trait]
pub trait Connector: Send + Sync {
    /// Builds the connection. Implementations must not fail on an
    /// unreachable server here; that surfaces on the first round trip.
    async fn connect(&self, options: &ConnectionOptions) -> Result<Box<dyn SeedStore>, DbFailure>;
}

/// A live connection scoped to one seeding run
#[async_trait]
pub trait SeedStore: Send + Sync {
    async fn ensure_uuid_extension(&self) -> Result<(), StepError>;

    /// Seeds every table inside a single transaction
    async fn seed_tables(&self, fixtures: Arc<Fixtures>) -> Result<SeedReport, StepError>;

    async fn close(self: Box<Self>) -> Result<(), DbFailure>;
}

/// Postgres connector backed by a single-connection sea-orm pool
#[derive(Debug, Clone, Copy, Default)]
pub struct SeaOrmConnector;

#[async_trait]
impl Connector for SeaOrmConnector {
    async fn connect(&self, options: &ConnectionOptions) -> Result<Box<dyn SeedStore>, DbFailure> {
        debug!(
            url = %options.redacted_url(),
            ssl = ?options.ssl,
            "Configuring seed connection"
        );

        let mut opt = ConnectOptions::new(options.effective_url());
        opt.max_connections(1)
            .min_connections(0)
            .connect_timeout(options.connect_timeout)
            .acquire_timeout(options.acquire_timeout)
            .connect_lazy(true)
            .sqlx_logging(false);

        // Driver errors echo the connection string back.
        let db = Database::connect(opt).await.map_err(|err| {
            let failure = DbFailure::from(err);
            DbFailure {
                message: options.redact(&failure.message),
                ..failure
            }
        })?;
        info!("Seed connection configured (ssl: {:?})", options.ssl);

        Ok(Box::new(SeaOrmStore { db }))
    }
}

pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SeedStore for SeaOrmStore {
    async fn ensure_uuid_extension(&self) -> Result<(), StepError> {
        tables::ensure_uuid_extension(&self.db).await
    }

    async fn seed_tables(&self, fixtures: Arc<Fixtures>) -> Result<SeedReport, StepError> {
        transaction_scope(&self.db, move |txn| {
            Box::pin(async move { tables::seed_all(txn, &fixtures).await })
        })
        .await
    }

    async fn close(self: Box<Self>) -> Result<(), DbFailure> {
        self.db.close().await?;
        debug!("Seed connection closed");
        Ok(())
    }
}
