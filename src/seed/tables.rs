//! Per-table seed operations.
//!
//! Each table follows the same shape: create the table if it is missing,
//! then insert every fixture row with a conflict-skip insert. The inserts of
//! one table are issued together and awaited as a group.

use futures::future::try_join_all;
use sea_orm::{ConnectionTrait, DbBackend, Statement, Value};
use serde::Serialize;
use tracing::debug;

use crate::errors::StepError;
use crate::models::{Customer, Invoice, RevenuePoint, User};
use crate::seed::fixtures::Fixtures;

/// bcrypt work factor for stored passwords
pub const PASSWORD_HASH_COST: u32 = 10;

pub const CREATE_UUID_EXTENSION: &str = r#"CREATE EXTENSION IF NOT EXISTS "uuid-ossp""#;

pub const CREATE_USERS: &str = r#"CREATE TABLE IF NOT EXISTS users (
    id UUID DEFAULT uuid_generate_v4() PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL
)"#;

pub const INSERT_USER: &str = r#"INSERT INTO users (id, name, email, password)
VALUES ($1, $2, $3, $4)
ON CONFLICT (id) DO NOTHING"#;

pub const CREATE_CUSTOMERS: &str = r#"CREATE TABLE IF NOT EXISTS customers (
    id UUID DEFAULT uuid_generate_v4() PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL,
    image_url VARCHAR(255) NOT NULL
)"#;

pub const INSERT_CUSTOMER: &str = r#"INSERT INTO customers (id, name, email, image_url)
VALUES ($1, $2, $3, $4)
ON CONFLICT (id) DO NOTHING"#;

pub const CREATE_INVOICES: &str = r#"CREATE TABLE IF NOT EXISTS invoices (
    id UUID DEFAULT uuid_generate_v4() PRIMARY KEY,
    customer_id UUID NOT NULL,
    amount INT NOT NULL,
    status VARCHAR(255) NOT NULL,
    date DATE NOT NULL
)"#;

// The id comes from the column default, so the NOT EXISTS guard is what
// keeps a re-run from inserting the same invoice twice.
pub const INSERT_INVOICE: &str = r#"INSERT INTO invoices (customer_id, amount, status, date)
SELECT $1, $2, $3, $4
WHERE NOT EXISTS (
    SELECT 1 FROM invoices
    WHERE customer_id = $1 AND amount = $2 AND status = $3 AND date = $4
)
ON CONFLICT (id) DO NOTHING"#;

pub const CREATE_REVENUE: &str = r#"CREATE TABLE IF NOT EXISTS revenue (
    month VARCHAR(4) NOT NULL UNIQUE,
    revenue INT NOT NULL
)"#;

pub const INSERT_REVENUE: &str = r#"INSERT INTO revenue (month, revenue)
VALUES ($1, $2)
ON CONFLICT (month) DO NOTHING"#;

/// Rows actually inserted per table; skipped duplicates are not counted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub users: u64,
    pub customers: u64,
    pub invoices: u64,
    pub revenue: u64,
}

impl SeedReport {
    pub fn total(&self) -> u64 {
        self.users + self.customers + self.invoices + self.revenue
    }
}

pub fn hash_password(plaintext: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(plaintext, PASSWORD_HASH_COST)
}

/// Installs the extension that backs the `uuid_generate_v4()` defaults
pub async fn ensure_uuid_extension<C: ConnectionTrait>(db: &C) -> Result<(), StepError> {
    db.execute(Statement::from_string(
        DbBackend::Postgres,
        CREATE_UUID_EXTENSION,
    ))
    .await?;
    Ok(())
}

/// Seeds all four tables concurrently; the first failure fails the group.
pub async fn seed_all<C: ConnectionTrait>(
    db: &C,
    fixtures: &Fixtures,
) -> Result<SeedReport, StepError> {
    let (users, customers, invoices, revenue) = tokio::try_join!(
        seed_users(db, &fixtures.users),
        seed_customers(db, &fixtures.customers),
        seed_invoices(db, &fixtures.invoices),
        seed_revenue(db, &fixtures.revenue),
    )?;

    Ok(SeedReport {
        users,
        customers,
        invoices,
        revenue,
    })
}

pub async fn seed_users<C: ConnectionTrait>(db: &C, users: &[User]) -> Result<u64, StepError> {
    create_table(db, CREATE_USERS).await?;
    let inserted = try_join_all(users.iter().map(|user| insert_user(db, user))).await?;
    let total: u64 = inserted.iter().sum();
    debug!(table = "users", inserted = total, "Seeded table");
    Ok(total)
}

async fn insert_user<C: ConnectionTrait>(db: &C, user: &User) -> Result<u64, StepError> {
    let plaintext = user.password.clone();
    let hashed = tokio::task::spawn_blocking(move || hash_password(&plaintext)).await??;
    execute(
        db,
        INSERT_USER,
        [
            Value::from(user.id),
            Value::from(user.name.clone()),
            Value::from(user.email.clone()),
            Value::from(hashed),
        ],
    )
    .await
}

pub async fn seed_customers<C: ConnectionTrait>(
    db: &C,
    customers: &[Customer],
) -> Result<u64, StepError> {
    create_table(db, CREATE_CUSTOMERS).await?;
    let inserted = try_join_all(customers.iter().map(|customer| {
        execute(
            db,
            INSERT_CUSTOMER,
            [
                Value::from(customer.id),
                Value::from(customer.name.clone()),
                Value::from(customer.email.clone()),
                Value::from(customer.image_url.clone()),
            ],
        )
    }))
    .await?;
    let total: u64 = inserted.iter().sum();
    debug!(table = "customers", inserted = total, "Seeded table");
    Ok(total)
}

pub async fn seed_invoices<C: ConnectionTrait>(
    db: &C,
    invoices: &[Invoice],
) -> Result<u64, StepError> {
    create_table(db, CREATE_INVOICES).await?;
    let inserted = try_join_all(invoices.iter().map(|invoice| {
        execute(
            db,
            INSERT_INVOICE,
            [
                Value::from(invoice.customer_id),
                Value::from(invoice.amount),
                Value::from(invoice.status.to_string()),
                Value::from(invoice.date),
            ],
        )
    }))
    .await?;
    let total: u64 = inserted.iter().sum();
    debug!(table = "invoices", inserted = total, "Seeded table");
    Ok(total)
}

pub async fn seed_revenue<C: ConnectionTrait>(
    db: &C,
    revenue: &[RevenuePoint],
) -> Result<u64, StepError> {
    create_table(db, CREATE_REVENUE).await?;
    let inserted = try_join_all(revenue.iter().map(|point| {
        execute(
            db,
            INSERT_REVENUE,
            [
                Value::from(point.month.clone()),
                Value::from(point.revenue),
            ],
        )
    }))
    .await?;
    let total: u64 = inserted.iter().sum();
    debug!(table = "revenue", inserted = total, "Seeded table");
    Ok(total)
}

async fn create_table<C: ConnectionTrait>(db: &C, ddl: &str) -> Result<(), StepError> {
    db.execute(Statement::from_string(DbBackend::Postgres, ddl))
        .await?;
    Ok(())
}

async fn execute<C, I>(db: &C, sql: &str, values: I) -> Result<u64, StepError>
where
    C: ConnectionTrait,
    I: IntoIterator<Item = Value>,
{
    let result = db
        .execute(Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            values,
        ))
        .await?;
    Ok(result.rows_affected())
}
