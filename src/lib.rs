//! Invoice dashboard API
//!
//! Serves the one-shot seed route that fills the dashboard's Postgres tables
//! with placeholder data, plus health probes.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod seed;
pub mod telemetry;

use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;

use crate::config::AppConfig;
use crate::seed::Seeder;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub seeder: Arc<Seeder>,
}

impl AppState {
    pub fn new(config: AppConfig, seeder: Seeder) -> Self {
        Self {
            config: Arc::new(config),
            seeder: Arc::new(seeder),
        }
    }
}

/// Builds the HTTP router with request-id and tracing layers applied
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::seed::seed_routes())
        .merge(handlers::health::health_routes())
        .layer(
            ServiceBuilder::new()
                .layer(telemetry::set_request_id_layer())
                .layer(telemetry::configure_http_tracing())
                .layer(telemetry::propagate_request_id_layer()),
        )
        .with_state(state)
}
