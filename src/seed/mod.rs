/*!
 * Database seeding
 *
 * A seed run validates the configured connection string, opens a scoped
 * connection, installs the UUID extension and fills the four dashboard
 * tables inside one transaction. The connection is closed exactly once on
 * every path out of [`Seeder::run`].
 */

pub mod fixtures;
pub mod tables;

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument, warn};

use crate::db::{ConnectionOptions, Connector, SeedStore};
use crate::errors::SeedError;

pub use fixtures::{FixtureError, Fixtures};
pub use tables::SeedReport;

pub const SEED_SUCCESS_MESSAGE: &str = "Database seeded successfully";

#[derive(Debug, Clone, Copy)]
pub struct SeedTimeouts {
    pub connect: Duration,
    pub acquire: Duration,
}

impl Default for SeedTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(10),
            acquire: Duration::from_secs(10),
        }
    }
}

pub struct Seeder {
    connector: Arc<dyn Connector>,
    fixtures: Arc<Fixtures>,
    timeouts: SeedTimeouts,
}

impl Seeder {
    pub fn new(connector: Arc<dyn Connector>, fixtures: Fixtures) -> Self {
        Self {
            connector,
            fixtures: Arc::new(fixtures),
            timeouts: SeedTimeouts::default(),
        }
    }

    pub fn with_timeouts(mut self, timeouts: SeedTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn fixtures(&self) -> &Fixtures {
        &self.fixtures
    }

    /// Runs one seeding pass against `database_url`.
    #[instrument(skip_all)]
    pub async fn run(&self, database_url: Option<&str>) -> Result<SeedReport, SeedError> {
        let url = database_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(SeedError::MissingEnvVar)?;

        let options = ConnectionOptions::from_url(url)
            .with_timeouts(self.timeouts.connect, self.timeouts.acquire);

        let store = self
            .connector
            .connect(&options)
            .await
            .map_err(SeedError::connection)?;

        let result = self.seed_with(store.as_ref()).await;

        // The outcome above decides the response; a failed close does not.
        let _ = store.close().await;

        match &result {
            Ok(report) => info!(
                users = report.users,
                customers = report.customers,
                invoices = report.invoices,
                revenue = report.revenue,
                "Seed run finished"
            ),
            Err(err) => warn!(code = err.code(), "Seed run failed: {}", err),
        }

        result
    }

    async fn seed_with(&self, store: &dyn SeedStore) -> Result<SeedReport, SeedError> {
        store.ensure_uuid_extension().await?;
        let report = store.seed_tables(Arc::clone(&self.fixtures)).await?;
        Ok(report)
    }
}
