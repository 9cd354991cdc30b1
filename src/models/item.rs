//! Item (equipment) model and related types.
//!
//! `available_quantity` is never stored: every read computes it from open
//! borrowals and capacity-holding reservations, which keeps the item row and
//! the live availability from drifting apart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::{ItemCategory, ItemStatus};

/// Equipment item with computed availability
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Item {
    pub id: i32,
    pub name: String,
    pub category: ItemCategory,
    pub facility_id: Option<i32>,
    /// Total owned units
    pub quantity: i32,
    /// Units free right now: quantity minus open borrowals minus
    /// capacity-holding reservations, floored at 0
    pub available_quantity: i32,
    pub condition: Option<String>,
    pub asset_tag: String,
    pub serial_number: Option<String>,
    pub status: ItemStatus,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create item request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateItem {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    pub category: ItemCategory,
    pub facility_id: Option<i32>,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: Option<i32>,
    pub condition: Option<String>,
    #[validate(length(min = 1, message = "Asset tag must not be empty"))]
    pub asset_tag: String,
    pub serial_number: Option<String>,
}

/// Update item request (all fields optional)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateItem {
    pub name: Option<String>,
    pub category: Option<ItemCategory>,
    pub facility_id: Option<i32>,
    pub quantity: Option<i32>,
    pub condition: Option<String>,
    pub serial_number: Option<String>,
    pub status: Option<ItemStatus>,
}

/// Item list query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ItemQuery {
    pub category: Option<ItemCategory>,
    pub facility_id: Option<i32>,
    pub status: Option<ItemStatus>,
    /// Free-text search on name and asset tag
    pub search: Option<String>,
    /// Include soft-deleted items (staff listings)
    pub include_inactive: Option<bool>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Delete item query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct DeleteItemParams {
    /// Force delete even with open borrowals
    pub force: Option<bool>,
}
