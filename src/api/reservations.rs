//! Reservation endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::reservation::{
        CreateReservation, Reservation, ReservationQuery, SlotQuery, SlotsResponse,
    },
};

use super::AuthenticatedUser;

/// Reserve one unit of an item for a pickup window
#[utoipa::path(
    post,
    path = "/reservations",
    tag = "reservations",
    security(("bearer_auth" = [])),
    request_body = CreateReservation,
    responses(
        (status = 201, description = "Reservation confirmed", body = Reservation),
        (status = 400, description = "Pickup date in the past, or item unavailable"),
        (status = 404, description = "Item not found"),
        (status = 409, description = "Window fully booked, or user already holds an overlapping reservation")
    )
)]
pub async fn create_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateReservation>,
) -> AppResult<(StatusCode, Json<Reservation>)> {
    let reservation = state
        .services
        .reservations
        .create(claims.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// List reservations (own, or filtered for staff)
#[utoipa::path(
    get,
    path = "/reservations",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(ReservationQuery),
    responses(
        (status = 200, description = "Reservations", body = Vec<Reservation>)
    )
)]
pub async fn list_reservations(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<ReservationQuery>,
) -> AppResult<Json<Vec<Reservation>>> {
    let reservations = state.services.reservations.list(&claims, query).await?;
    Ok(Json(reservations))
}

/// Cancel a reservation (owner or staff)
#[utoipa::path(
    put,
    path = "/reservations/{id}/cancel",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation cancelled", body = Reservation),
        (status = 400, description = "Already cancelled or no longer active"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn cancel_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Reservation>> {
    let cancelled = state.services.reservations.cancel(&claims, id).await?;
    Ok(Json(cancelled))
}

/// Hourly pickup-slot availability for an item on a given day
#[utoipa::path(
    get,
    path = "/reservations/slots",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(SlotQuery),
    responses(
        (status = 200, description = "Slot availability", body = SlotsResponse),
        (status = 404, description = "Item not found")
    )
)]
pub async fn reservation_slots(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<SlotQuery>,
) -> AppResult<Json<SlotsResponse>> {
    let slots = state
        .services
        .reservations
        .slots(query.item_id, query.date)
        .await?;
    Ok(Json(slots))
}
