//! Facility model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A campus facility that owns lendable equipment (media lab, gear desk, ...)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Facility {
    pub id: i32,
    pub name: String,
    pub campus: Option<String>,
    pub building: Option<String>,
    pub room: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create facility request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateFacility {
    pub name: String,
    pub campus: Option<String>,
    pub building: Option<String>,
    pub room: Option<String>,
}

/// Update facility request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateFacility {
    pub name: Option<String>,
    pub campus: Option<String>,
    pub building: Option<String>,
    pub room: Option<String>,
    pub is_active: Option<bool>,
}
