//! Fine model and related types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::enums::{FineReason, FineStatus};

/// Fine record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Fine {
    pub id: i32,
    pub user_id: i32,
    pub borrowal_id: Option<i32>,
    pub item_id: Option<i32>,
    pub amount: Decimal,
    pub reason: FineReason,
    pub status: FineStatus,
    pub payment_method: Option<String>,
    pub receipt_number: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Manual fine creation (staff: damage, loss, other)
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateFine {
    pub user_id: i32,
    pub borrowal_id: Option<i32>,
    pub item_id: Option<i32>,
    pub amount: Decimal,
    pub reason: FineReason,
}

/// Fine payment request
#[derive(Debug, Deserialize, ToSchema)]
pub struct PayFineRequest {
    /// `campus-cash` debits the user's balance; any other method is
    /// recorded as paid at the desk without balance checks
    pub method: String,
}

/// Fine list query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct FineQuery {
    /// Staff only; students always see their own
    pub user_id: Option<i32>,
    pub status: Option<FineStatus>,
}
