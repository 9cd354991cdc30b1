//! Borrowal (checkout/return/renewal) endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::borrowal::{Borrowal, BorrowalQuery, CheckoutRequest, ReturnRequest},
};

use super::AuthenticatedUser;

/// Check out one unit of an item to a user (staff desk operation)
#[utoipa::path(
    post,
    path = "/borrowals/checkout",
    tag = "borrowals",
    security(("bearer_auth" = [])),
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Checked out", body = Borrowal),
        (status = 400, description = "Item not lendable or invalid due date"),
        (status = 403, description = "Staff privileges required"),
        (status = 404, description = "User or item not found"),
        (status = 409, description = "No units available")
    )
)]
pub async fn checkout(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CheckoutRequest>,
) -> AppResult<(StatusCode, Json<Borrowal>)> {
    claims.require_staff()?;

    let borrowal = state.services.borrowals.checkout(request).await?;
    Ok((StatusCode::CREATED, Json(borrowal)))
}

/// Return a borrowed item (staff desk operation)
#[utoipa::path(
    put,
    path = "/borrowals/{id}/return",
    tag = "borrowals",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Borrowal ID")),
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Item returned", body = Borrowal),
        (status = 400, description = "Item already returned"),
        (status = 403, description = "Staff privileges required"),
        (status = 404, description = "Borrowal not found")
    )
)]
pub async fn return_borrowal(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    request: Option<Json<ReturnRequest>>,
) -> AppResult<Json<Borrowal>> {
    claims.require_staff()?;

    let request = request.map(|Json(r)| r).unwrap_or_default();
    let borrowal = state.services.borrowals.return_borrowal(id, request).await?;

    // Offer the freed unit to the waitlist head right away; the periodic
    // scan remains the catch-all if this attempt fails
    if let Err(e) = state
        .services
        .waitlist
        .promote_for_item(borrowal.item_id)
        .await
    {
        tracing::warn!(
            item_id = borrowal.item_id,
            error = %e,
            "waitlist promotion after return failed"
        );
    }

    Ok(Json(borrowal))
}

/// Renew a borrowal (owner or staff): extends the due date by a fixed period
#[utoipa::path(
    put,
    path = "/borrowals/{id}/renew",
    tag = "borrowals",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Borrowal ID")),
    responses(
        (status = 200, description = "Borrowal renewed", body = Borrowal),
        (status = 400, description = "Borrowal is not active"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Borrowal not found")
    )
)]
pub async fn renew_borrowal(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Borrowal>> {
    let borrowal = state.services.borrowals.renew(&claims, id).await?;
    Ok(Json(borrowal))
}

/// List borrowals (own, or filtered for staff)
#[utoipa::path(
    get,
    path = "/borrowals",
    tag = "borrowals",
    security(("bearer_auth" = [])),
    params(BorrowalQuery),
    responses(
        (status = 200, description = "Borrowals", body = Vec<Borrowal>)
    )
)]
pub async fn list_borrowals(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<BorrowalQuery>,
) -> AppResult<Json<Vec<Borrowal>>> {
    let borrowals = state.services.borrowals.list(&claims, query).await?;
    Ok(Json(borrowals))
}

/// Get one borrowal (owner or staff)
#[utoipa::path(
    get,
    path = "/borrowals/{id}",
    tag = "borrowals",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Borrowal ID")),
    responses(
        (status = 200, description = "Borrowal details", body = Borrowal),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Borrowal not found")
    )
)]
pub async fn get_borrowal(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Borrowal>> {
    let borrowal = state.services.borrowals.get(&claims, id).await?;
    Ok(Json(borrowal))
}
