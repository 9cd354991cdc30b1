//! Reservations repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::reservation::{Reservation, ReservationQuery, ReservationWindow},
};

use super::items;

#[derive(Clone)]
pub struct ReservationsRepository {
    pool: Pool<Postgres>,
}

impl ReservationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get reservation by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Reservation> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reservation with id {} not found", id)))
    }

    /// Admit a reservation for `[pickup_date, expiry_date)`.
    ///
    /// The item row is locked first, so the two conflict counts and the
    /// insert form one serialized admission decision per item: concurrent
    /// requests cannot both pass the capacity check.
    pub async fn reserve(
        &self,
        user_id: i32,
        item_id: i32,
        pickup_date: DateTime<Utc>,
        expiry_date: DateTime<Utc>,
    ) -> AppResult<Reservation> {
        let mut tx = self.pool.begin().await?;

        let item = items::lock_item(&mut tx, item_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", item_id)))?;

        if !item.is_active {
            return Err(AppError::NotFound(format!("Item with id {} not found", item_id)));
        }
        if !item.status.is_lendable() {
            return Err(AppError::BadRequest(format!(
                "Item cannot be reserved (status: {})",
                item.status
            )));
        }

        // Anti-hoarding: one overlapping hold per user per item
        let own_overlaps: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM reservations
            WHERE user_id = $1 AND item_id = $2
              AND status IN ('pending', 'confirmed')
              AND pickup_date < $3 AND expiry_date > $4
            "#,
        )
        .bind(user_id)
        .bind(item_id)
        .bind(expiry_date)
        .bind(pickup_date)
        .fetch_one(&mut *tx)
        .await?;

        if own_overlaps > 0 {
            return Err(AppError::Conflict(
                "You already hold a reservation for this item in that window".to_string(),
            ));
        }

        let overlapping: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM reservations
            WHERE item_id = $1
              AND status IN ('pending', 'confirmed')
              AND pickup_date < $2 AND expiry_date > $3
            "#,
        )
        .bind(item_id)
        .bind(expiry_date)
        .bind(pickup_date)
        .fetch_one(&mut *tx)
        .await?;

        if overlapping >= item.quantity as i64 {
            return Err(AppError::Conflict(
                "No reservation capacity left for the requested window".to_string(),
            ));
        }

        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (user_id, item_id, reserved_at, pickup_date, expiry_date, status)
            VALUES ($1, $2, $3, $4, $5, 'confirmed')
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(item_id)
        .bind(Utc::now())
        .bind(pickup_date)
        .bind(expiry_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(reservation)
    }

    /// List reservations with filters
    pub async fn list(&self, query: &ReservationQuery) -> AppResult<Vec<Reservation>> {
        let mut conditions = vec!["TRUE".to_string()];
        let mut idx = 0;

        if query.user_id.is_some() {
            idx += 1;
            conditions.push(format!("user_id = ${}", idx));
        }
        if query.item_id.is_some() {
            idx += 1;
            conditions.push(format!("item_id = ${}", idx));
        }
        if query.status.is_some() {
            idx += 1;
            conditions.push(format!("status = ${}", idx));
        }

        let sql = format!(
            "SELECT * FROM reservations WHERE {} ORDER BY pickup_date DESC",
            conditions.join(" AND ")
        );

        let mut builder = sqlx::query_as::<_, Reservation>(&sql);
        if let Some(user_id) = query.user_id {
            builder = builder.bind(user_id);
        }
        if let Some(item_id) = query.item_id {
            builder = builder.bind(item_id);
        }
        if let Some(status) = query.status {
            builder = builder.bind(status);
        }

        Ok(builder.fetch_all(&self.pool).await?)
    }

    /// Mark a reservation cancelled
    pub async fn cancel(&self, id: i32) -> AppResult<Reservation> {
        let cancelled = sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET status = 'cancelled' WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(cancelled)
    }

    /// Capacity-holding windows for an item intersecting `[from, to)`,
    /// used by the pickup-slot computation
    pub async fn windows_overlapping(
        &self,
        item_id: i32,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<ReservationWindow>> {
        let rows = sqlx::query_as::<_, ReservationWindow>(
            r#"
            SELECT pickup_date, expiry_date FROM reservations
            WHERE item_id = $1
              AND status IN ('pending', 'confirmed')
              AND pickup_date < $2 AND expiry_date > $3
            ORDER BY pickup_date
            "#,
        )
        .bind(item_id)
        .bind(to)
        .bind(from)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Expire every capacity-holding reservation whose pickup window has
    /// lapsed, so it stops counting against availability. Returns how many
    /// were expired.
    pub async fn expire_lapsed(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE reservations SET status = 'expired' \
             WHERE status IN ('pending', 'confirmed') AND expiry_date < $1",
        )
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Count capacity-holding reservations
    pub async fn count_open(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reservations WHERE status IN ('pending', 'confirmed')",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
