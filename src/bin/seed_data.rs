//! Seed data script - populates the dashboard database with the placeholder data
//!
//! Run with: cargo run --bin seed-data -- --database-url postgres://...
//!
//! Without `--database-url` the configured `POSTGRES_URL` is used. The run is
//! idempotent: rows that already exist are skipped.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use invoice_dashboard_api::{
    config,
    db::SeaOrmConnector,
    errors::ErrorResponse,
    seed::{Fixtures, Seeder, SEED_SUCCESS_MESSAGE},
};

#[derive(Debug, Parser)]
#[command(name = "seed-data", about = "Seed the dashboard database with placeholder data")]
struct Cli {
    /// Postgres connection string; overrides POSTGRES_URL
    #[arg(long)]
    database_url: Option<String>,

    /// Print the per-table report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let cfg = config::load_config().context("failed to load configuration")?;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    let fixtures = Fixtures::bundled().context("bundled fixtures are invalid")?;
    info!("Loaded {} fixture rows", fixtures.row_count());

    let seeder = Seeder::new(Arc::new(SeaOrmConnector), fixtures).with_timeouts(cfg.seed_timeouts());
    let database_url = cli.database_url.as_deref().or(cfg.postgres_url());

    match seeder.run(database_url).await {
        Ok(report) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", SEED_SUCCESS_MESSAGE);
                println!("  users:     {} inserted", report.users);
                println!("  customers: {} inserted", report.customers);
                println!("  invoices:  {} inserted", report.invoices);
                println!("  revenue:   {} inserted", report.revenue);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}", serde_json::to_string_pretty(&ErrorResponse::from(&err))?);
            Ok(ExitCode::FAILURE)
        }
    }
}
