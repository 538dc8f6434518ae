//! Placeholder rows shipped with the dashboard.
//!
//! The data lives in `fixtures/placeholder-data.json` and is embedded into the
//! binary, so a seed run never depends on files next to the executable.

use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;
use validator::Validate;

use crate::models::{Customer, Invoice, RevenuePoint, User};

const BUNDLED_FIXTURES: &str = include_str!("../../fixtures/placeholder-data.json");

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Fixture parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid fixture row in {table}: {reason}")]
    Invalid { table: &'static str, reason: String },
}

impl FixtureError {
    fn invalid(table: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            table,
            reason: reason.into(),
        }
    }
}

/// Every row the seeder writes, grouped by table
#[derive(Clone, Debug, Deserialize)]
pub struct Fixtures {
    pub users: Vec<User>,
    pub customers: Vec<Customer>,
    pub invoices: Vec<Invoice>,
    pub revenue: Vec<RevenuePoint>,
}

impl Fixtures {
    /// Parses and checks the bundled placeholder data
    pub fn bundled() -> Result<Self, FixtureError> {
        Self::from_json(BUNDLED_FIXTURES)
    }

    pub fn from_json(raw: &str) -> Result<Self, FixtureError> {
        let fixtures: Fixtures = serde_json::from_str(raw)?;
        fixtures.check()?;
        Ok(fixtures)
    }

    pub fn row_count(&self) -> usize {
        self.users.len() + self.customers.len() + self.invoices.len() + self.revenue.len()
    }

    fn check(&self) -> Result<(), FixtureError> {
        let mut emails = HashSet::new();
        for user in &self.users {
            user.validate()
                .map_err(|e| FixtureError::invalid("users", e.to_string()))?;
            if !emails.insert(user.email.to_lowercase()) {
                return Err(FixtureError::invalid(
                    "users",
                    format!("duplicate email {}", user.email),
                ));
            }
        }

        let mut customer_ids = HashSet::new();
        for customer in &self.customers {
            customer
                .validate()
                .map_err(|e| FixtureError::invalid("customers", e.to_string()))?;
            customer_ids.insert(customer.id);
        }

        for invoice in &self.invoices {
            invoice
                .validate()
                .map_err(|e| FixtureError::invalid("invoices", e.to_string()))?;
            if !customer_ids.contains(&invoice.customer_id) {
                return Err(FixtureError::invalid(
                    "invoices",
                    format!("unknown customer {}", invoice.customer_id),
                ));
            }
        }

        let mut months = HashSet::new();
        for point in &self.revenue {
            point
                .validate()
                .map_err(|e| FixtureError::invalid("revenue", e.to_string()))?;
            if !months.insert(point.month.as_str()) {
                return Err(FixtureError::invalid(
                    "revenue",
                    format!("duplicate month {}", point.month),
                ));
            }
        }

        Ok(())
    }
}
