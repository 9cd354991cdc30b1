//! Fine and payment endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::fine::{CreateFine, Fine, FineQuery, PayFineRequest},
};

use super::AuthenticatedUser;

/// List fines (own, or filtered for staff)
#[utoipa::path(
    get,
    path = "/fines",
    tag = "fines",
    security(("bearer_auth" = [])),
    params(FineQuery),
    responses(
        (status = 200, description = "Fines", body = Vec<Fine>)
    )
)]
pub async fn list_fines(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<FineQuery>,
) -> AppResult<Json<Vec<Fine>>> {
    let fines = state.services.fines.list(&claims, query).await?;
    Ok(Json(fines))
}

/// Record a manual fine (staff: damage, loss, other)
#[utoipa::path(
    post,
    path = "/fines",
    tag = "fines",
    security(("bearer_auth" = [])),
    request_body = CreateFine,
    responses(
        (status = 201, description = "Fine created", body = Fine),
        (status = 400, description = "Invalid amount"),
        (status = 403, description = "Staff privileges required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn create_fine(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateFine>,
) -> AppResult<(StatusCode, Json<Fine>)> {
    claims.require_staff()?;

    let fine = state.services.fines.create(request).await?;
    Ok((StatusCode::CREATED, Json(fine)))
}

/// Pay a fine. `campus-cash` debits the user's balance; any other method is
/// recorded as settled at the desk.
#[utoipa::path(
    post,
    path = "/fines/{id}/pay",
    tag = "fines",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Fine ID")),
    request_body = PayFineRequest,
    responses(
        (status = 200, description = "Fine paid", body = Fine),
        (status = 400, description = "Already paid, waived, or insufficient campus cash"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Fine not found")
    )
)]
pub async fn pay_fine(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<PayFineRequest>,
) -> AppResult<Json<Fine>> {
    let fine = state.services.fines.pay(&claims, id, request).await?;
    Ok(Json(fine))
}

/// Waive a pending fine (staff)
#[utoipa::path(
    put,
    path = "/fines/{id}/waive",
    tag = "fines",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Fine ID")),
    responses(
        (status = 200, description = "Fine waived", body = Fine),
        (status = 400, description = "Only pending fines can be waived"),
        (status = 403, description = "Staff privileges required"),
        (status = 404, description = "Fine not found")
    )
)]
pub async fn waive_fine(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Fine>> {
    claims.require_staff()?;

    let fine = state.services.fines.waive(id).await?;
    Ok(Json(fine))
}
