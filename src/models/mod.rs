use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Dashboard login account. The fixture carries the plaintext password;
/// only its bcrypt hash is ever written to the database.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
pub struct User {
    pub id: Uuid,
    #[validate(length(min = 1, max = 255, message = "User name must be 1-255 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
pub struct Customer {
    pub id: Uuid,
    #[validate(length(min = 1, max = 255, message = "Customer name must be 1-255 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, max = 255, message = "Image URL must be 1-255 characters"))]
    pub image_url: String,
}

/// Enum representing the possible statuses of an invoice.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

/// Invoice fixture row. The id is left to the database default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
pub struct Invoice {
    pub customer_id: Uuid,
    /// Amount in cents
    #[validate(range(min = 0, message = "Invoice amount cannot be negative"))]
    pub amount: i32,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
pub struct RevenuePoint {
    #[validate(length(min = 3, max = 4, message = "Month code must be 3-4 characters"))]
    pub month: String,
    pub revenue: i32,
}
