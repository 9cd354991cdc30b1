//! Borrowal (checkout) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::enums::{BorrowalStatus, ItemCategory};

/// Borrowal record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Borrowal {
    pub id: i32,
    pub user_id: i32,
    pub item_id: i32,
    pub checkout_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub status: BorrowalStatus,
    pub condition_on_return: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Checkout request (staff desk operation)
#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub user_id: i32,
    pub item_id: i32,
    /// Defaults to now + the configured loan period
    pub due_date: Option<DateTime<Utc>>,
}

/// Return request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ReturnRequest {
    /// Condition noted at the desk on return
    pub condition: Option<String>,
}

/// Borrowal list query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BorrowalQuery {
    /// Staff only; students always see their own
    pub user_id: Option<i32>,
    pub item_id: Option<i32>,
    pub status: Option<BorrowalStatus>,
}

/// Row fed to the overdue scan: an open borrowal past its due date,
/// joined with the item category that sets the fee rate.
#[derive(Debug, Clone, FromRow)]
pub struct OverdueBorrowal {
    pub id: i32,
    pub user_id: i32,
    pub item_id: i32,
    pub due_date: DateTime<Utc>,
    pub status: BorrowalStatus,
    pub category: ItemCategory,
    pub item_name: String,
}
