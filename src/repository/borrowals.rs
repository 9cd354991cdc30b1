//! Borrowals repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        borrowal::{Borrowal, BorrowalQuery, OverdueBorrowal},
        enums::BorrowalStatus,
    },
};

use super::items;

#[derive(Clone)]
pub struct BorrowalsRepository {
    pool: Pool<Postgres>,
}

impl BorrowalsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get borrowal by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Borrowal> {
        sqlx::query_as::<_, Borrowal>("SELECT * FROM borrowals WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrowal with id {} not found", id)))
    }

    /// List borrowals with filters
    pub async fn list(&self, query: &BorrowalQuery) -> AppResult<Vec<Borrowal>> {
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
            "SELECT * FROM borrowals WHERE {} ORDER BY checkout_date DESC",
            conditions.join(" AND ")
        );

        let mut builder = sqlx::query_as::<_, Borrowal>(&sql);
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

    /// Check out one unit of an item to a user.
    ///
    /// The item row is locked so the availability check and the insert are a
    /// single admission decision; a reservation being picked up and a
    /// notified waitlist claim are settled in the same transaction.
    pub async fn checkout(
        &self,
        user_id: i32,
        item_id: i32,
        due_date: DateTime<Utc>,
    ) -> AppResult<Borrowal> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let item = items::lock_item(&mut tx, item_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", item_id)))?;

        if !item.is_active {
            return Err(AppError::NotFound(format!("Item with id {} not found", item_id)));
        }
        if !item.status.is_lendable() {
            return Err(AppError::BadRequest(format!(
                "Item is not available for checkout (status: {})",
                item.status
            )));
        }

        // A reservation whose pickup window contains now is being collected.
        // Fulfil it before the availability check so the hold it kept against
        // capacity is released to its own pickup.
        sqlx::query(
            r#"
            UPDATE reservations SET status = 'fulfilled'
            WHERE id = (
                SELECT id FROM reservations
                WHERE user_id = $1 AND item_id = $2
                  AND status IN ('pending', 'confirmed')
                  AND pickup_date <= $3 AND expiry_date > $3
                ORDER BY pickup_date
                LIMIT 1
            )
            "#,
        )
        .bind(user_id)
        .bind(item_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let available = items::available_quantity(&mut tx, item_id).await?;
        if available <= 0 {
            return Err(AppError::Conflict("No units available for checkout".to_string()));
        }

        let borrowal = sqlx::query_as::<_, Borrowal>(
            r#"
            INSERT INTO borrowals (user_id, item_id, checkout_date, due_date, status)
            VALUES ($1, $2, $3, $4, 'active')
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(item_id)
        .bind(now)
        .bind(due_date)
        .fetch_one(&mut *tx)
        .await?;

        // A notified waitlist entry being claimed leaves the queue
        let claimed = sqlx::query(
            "SELECT id, queue_position FROM waitlist_entries \
             WHERE user_id = $1 AND item_id = $2 AND status = 'notified' FOR UPDATE",
        )
        .bind(user_id)
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(row) = claimed {
            let entry_id: i32 = row.get("id");
            let position: i32 = row.get("queue_position");

            sqlx::query("UPDATE waitlist_entries SET status = 'fulfilled' WHERE id = $1")
                .bind(entry_id)
                .execute(&mut *tx)
                .await?;

            sqlx::query(
                "UPDATE waitlist_entries SET queue_position = queue_position - 1 \
                 WHERE item_id = $1 AND status IN ('waiting', 'notified') AND queue_position > $2",
            )
            .bind(item_id)
            .bind(position)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(borrowal)
    }

    /// Mark a borrowal returned
    pub async fn return_borrowal(
        &self,
        id: i32,
        condition: Option<&str>,
    ) -> AppResult<Borrowal> {
        let borrowal = self.get_by_id(id).await?;

        if borrowal.status == BorrowalStatus::Returned || borrowal.return_date.is_some() {
            return Err(AppError::BadRequest("Item already returned".to_string()));
        }

        let returned = sqlx::query_as::<_, Borrowal>(
            r#"
            UPDATE borrowals
            SET status = 'returned', return_date = $1, condition_on_return = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(Utc::now())
        .bind(condition)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(returned)
    }

    /// Extend the due date of an active borrowal
    pub async fn renew(&self, id: i32, extend_days: i64) -> AppResult<Borrowal> {
        let borrowal = self.get_by_id(id).await?;

        if borrowal.status != BorrowalStatus::Active {
            return Err(AppError::BadRequest(format!(
                "Only active borrowals can be renewed (status: {})",
                borrowal.status
            )));
        }

        let new_due = borrowal.due_date + chrono::Duration::days(extend_days);

        let renewed = sqlx::query_as::<_, Borrowal>(
            "UPDATE borrowals SET due_date = $1 WHERE id = $2 RETURNING *",
        )
        .bind(new_due)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(renewed)
    }

    /// Open borrowals past their due date, with the item category that sets
    /// the fee rate. Input to the overdue scan.
    pub async fn list_due_for_scan(&self, now: DateTime<Utc>) -> AppResult<Vec<OverdueBorrowal>> {
        let rows = sqlx::query_as::<_, OverdueBorrowal>(
            r#"
            SELECT b.id, b.user_id, b.item_id, b.due_date, b.status, i.category, i.name AS item_name
            FROM borrowals b
            JOIN items i ON b.item_id = i.id
            WHERE b.status IN ('active', 'overdue') AND b.due_date < $1
            ORDER BY b.due_date
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Transition an active borrowal to overdue; no-op when already overdue
    pub async fn mark_overdue(&self, id: i32) -> AppResult<()> {
        sqlx::query("UPDATE borrowals SET status = 'overdue' WHERE id = $1 AND status = 'active'")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Count open borrowals
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrowals WHERE status IN ('active', 'overdue')",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Count overdue borrowals
    pub async fn count_overdue(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM borrowals WHERE status = 'overdue'")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
