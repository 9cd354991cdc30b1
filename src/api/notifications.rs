//! Notification inbox endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::notification::{Notification, NotificationQuery},
};

use super::AuthenticatedUser;

#[derive(Serialize, ToSchema)]
pub struct ReadAllResponse {
    /// How many notifications were marked read
    pub marked_read: u64,
}

/// List the caller's notifications
#[utoipa::path(
    get,
    path = "/notifications",
    tag = "notifications",
    security(("bearer_auth" = [])),
    params(NotificationQuery),
    responses(
        (status = 200, description = "Notifications", body = Vec<Notification>)
    )
)]
pub async fn list_notifications(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<NotificationQuery>,
) -> AppResult<Json<Vec<Notification>>> {
    let notifications = state
        .services
        .notifications
        .list(&claims, query.unread_only.unwrap_or(false))
        .await?;
    Ok(Json(notifications))
}

/// Mark one notification read
#[utoipa::path(
    put,
    path = "/notifications/{id}/read",
    tag = "notifications",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Notification ID")),
    responses(
        (status = 204, description = "Marked read"),
        (status = 404, description = "Notification not found")
    )
)]
pub async fn mark_notification_read(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<axum::http::StatusCode> {
    state.services.notifications.mark_read(&claims, id).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

/// Mark all notifications read
#[utoipa::path(
    put,
    path = "/notifications/read-all",
    tag = "notifications",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All marked read", body = ReadAllResponse)
    )
)]
pub async fn mark_all_notifications_read(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ReadAllResponse>> {
    let marked_read = state.services.notifications.mark_all_read(&claims).await?;
    Ok(Json(ReadAllResponse { marked_read }))
}
