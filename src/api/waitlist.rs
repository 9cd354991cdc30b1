//! Waitlist endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::waitlist::{JoinWaitlistRequest, WaitlistEntry, WaitlistQuery},
};

use super::AuthenticatedUser;

/// Join the waitlist for an item
#[utoipa::path(
    post,
    path = "/waitlist",
    tag = "waitlist",
    security(("bearer_auth" = [])),
    request_body = JoinWaitlistRequest,
    responses(
        (status = 201, description = "Joined the queue", body = WaitlistEntry),
        (status = 404, description = "Item not found"),
        (status = 409, description = "Already on the waitlist for this item")
    )
)]
pub async fn join_waitlist(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<JoinWaitlistRequest>,
) -> AppResult<(StatusCode, Json<WaitlistEntry>)> {
    let entry = state.services.waitlist.join(claims.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Leave the waitlist (owner or staff); later entries move up
#[utoipa::path(
    delete,
    path = "/waitlist/{id}",
    tag = "waitlist",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Waitlist entry ID")),
    responses(
        (status = 200, description = "Left the queue", body = WaitlistEntry),
        (status = 400, description = "Entry is no longer queued"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Entry not found")
    )
)]
pub async fn leave_waitlist(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<WaitlistEntry>> {
    let entry = state.services.waitlist.leave(&claims, id).await?;
    Ok(Json(entry))
}

/// List waitlist entries: the caller's own, or a full item queue for staff
#[utoipa::path(
    get,
    path = "/waitlist",
    tag = "waitlist",
    security(("bearer_auth" = [])),
    params(WaitlistQuery),
    responses(
        (status = 200, description = "Waitlist entries", body = Vec<WaitlistEntry>)
    )
)]
pub async fn list_waitlist(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<WaitlistQuery>,
) -> AppResult<Json<Vec<WaitlistEntry>>> {
    let entries = state.services.waitlist.list(&claims, query).await?;
    Ok(Json(entries))
}
