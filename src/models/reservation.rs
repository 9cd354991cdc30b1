//! Reservation model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::enums::ReservationStatus;

/// Reservation record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reservation {
    pub id: i32,
    pub user_id: i32,
    pub item_id: i32,
    pub reserved_at: DateTime<Utc>,
    pub pickup_date: DateTime<Utc>,
    /// End of the pickup window: `pickup_date` + the configured hold time
    pub expiry_date: DateTime<Utc>,
    pub status: ReservationStatus,
}

/// Create reservation request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReservation {
    pub item_id: i32,
    pub pickup_date: DateTime<Utc>,
}

/// Reservation list query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ReservationQuery {
    /// Staff only; students always see their own
    pub user_id: Option<i32>,
    pub item_id: Option<i32>,
    pub status: Option<ReservationStatus>,
}

/// Pickup-slot query: availability per hourly slot for one item and day
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct SlotQuery {
    pub item_id: i32,
    /// Day to inspect (YYYY-MM-DD); defaults to today
    pub date: Option<NaiveDate>,
}

/// Remaining reservation capacity for one hourly pickup slot
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SlotAvailability {
    pub pickup_date: DateTime<Utc>,
    /// Units not yet claimed by an overlapping reservation window
    pub remaining: i32,
}

/// Per-day slot listing for an item
#[derive(Debug, Serialize, ToSchema)]
pub struct SlotsResponse {
    pub item_id: i32,
    pub date: NaiveDate,
    pub quantity: i32,
    pub slots: Vec<SlotAvailability>,
}

/// A reservation window that holds capacity, as loaded for slot computation
#[derive(Debug, Clone, FromRow)]
pub struct ReservationWindow {
    pub pickup_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
}
