//! Facilities repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::facility::{CreateFacility, Facility, UpdateFacility},
};

#[derive(Clone)]
pub struct FacilitiesRepository {
    pool: Pool<Postgres>,
}

impl FacilitiesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all facilities
    pub async fn list(&self) -> AppResult<Vec<Facility>> {
        let rows = sqlx::query_as::<_, Facility>("SELECT * FROM facilities ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get facility by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Facility> {
        sqlx::query_as::<_, Facility>("SELECT * FROM facilities WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Facility with id {} not found", id)))
    }

    /// Create a facility
    pub async fn create(&self, data: &CreateFacility) -> AppResult<Facility> {
        let facility = sqlx::query_as::<_, Facility>(
            r#"
            INSERT INTO facilities (name, campus, building, room)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.campus)
        .bind(&data.building)
        .bind(&data.room)
        .fetch_one(&self.pool)
        .await?;
        Ok(facility)
    }

    /// Update a facility (partial update)
    pub async fn update(&self, id: i32, data: &UpdateFacility) -> AppResult<Facility> {
        sqlx::query_as::<_, Facility>(
            r#"
            UPDATE facilities
            SET name = COALESCE($1, name),
                campus = COALESCE($2, campus),
                building = COALESCE($3, building),
                room = COALESCE($4, room),
                is_active = COALESCE($5, is_active),
                updated_at = NOW()
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.campus)
        .bind(&data.building)
        .bind(&data.room)
        .bind(data.is_active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Facility with id {} not found", id)))
    }
}
