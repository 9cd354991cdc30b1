//! Staff dashboard endpoint

use axum::{extract::State, Json};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;

use super::AuthenticatedUser;

#[derive(Serialize, ToSchema)]
pub struct BorrowalCounts {
    pub active: i64,
    pub overdue: i64,
}

#[derive(Serialize, ToSchema)]
pub struct FineCounts {
    pub pending: i64,
    /// Total outstanding amount across pending fines
    pub pending_amount: Decimal,
}

/// Live platform counts
#[derive(Serialize, ToSchema)]
pub struct DashboardResponse {
    /// Active catalog items
    pub items: i64,
    /// Non-deleted user accounts
    pub users: i64,
    pub borrowals: BorrowalCounts,
    /// Capacity-holding reservations
    pub open_reservations: i64,
    pub fines: FineCounts,
    /// Entries currently waiting in a queue
    pub waitlist_waiting: i64,
}

/// Staff dashboard with live counts
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard counts", body = DashboardResponse),
        (status = 403, description = "Staff privileges required")
    )
)]
pub async fn get_dashboard(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<DashboardResponse>> {
    claims.require_staff()?;

    let dashboard = state.services.stats.dashboard().await?;
    Ok(Json(dashboard))
}
