//! Waitlist entry model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::enums::WaitlistStatus;

/// Waitlist entry from database. Positions are 1-based and renumbered
/// whenever an entry leaves the queue, so the head is always position 1.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WaitlistEntry {
    pub id: i32,
    pub user_id: i32,
    pub item_id: i32,
    #[serde(rename = "position")]
    pub queue_position: i32,
    pub status: WaitlistStatus,
    pub notified_at: Option<DateTime<Utc>>,
    /// End of the claim window once notified
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Join waitlist request
#[derive(Debug, Deserialize, ToSchema)]
pub struct JoinWaitlistRequest {
    pub item_id: i32,
}

/// Waitlist query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct WaitlistQuery {
    /// Staff may inspect a full item queue
    pub item_id: Option<i32>,
}
