//! Facility endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::facility::{CreateFacility, Facility, UpdateFacility},
};

use super::AuthenticatedUser;

/// List facilities
#[utoipa::path(
    get,
    path = "/facilities",
    tag = "facilities",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of facilities", body = Vec<Facility>)
    )
)]
pub async fn list_facilities(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Facility>>> {
    let facilities = state.services.inventory.list_facilities().await?;
    Ok(Json(facilities))
}

/// Create a facility
#[utoipa::path(
    post,
    path = "/facilities",
    tag = "facilities",
    security(("bearer_auth" = [])),
    request_body = CreateFacility,
    responses(
        (status = 201, description = "Facility created", body = Facility),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Staff privileges required")
    )
)]
pub async fn create_facility(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(facility): Json<CreateFacility>,
) -> AppResult<(StatusCode, Json<Facility>)> {
    claims.require_staff()?;

    let created = state.services.inventory.create_facility(facility).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a facility
#[utoipa::path(
    put,
    path = "/facilities/{id}",
    tag = "facilities",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Facility ID")),
    request_body = UpdateFacility,
    responses(
        (status = 200, description = "Facility updated", body = Facility),
        (status = 403, description = "Staff privileges required"),
        (status = 404, description = "Facility not found")
    )
)]
pub async fn update_facility(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(facility): Json<UpdateFacility>,
) -> AppResult<Json<Facility>> {
    claims.require_staff()?;

    let updated = state.services.inventory.update_facility(id, facility).await?;
    Ok(Json(updated))
}
