//! Waitlist repository for database operations.
//!
//! Queue positions are 1-based and live entries (waiting or notified) are
//! renumbered inside the same transaction whenever an entry leaves the
//! queue, so the head is always position 1 and the queue cannot stall.

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::WaitlistStatus,
        waitlist::WaitlistEntry,
    },
};

use super::items;

#[derive(Clone)]
pub struct WaitlistRepository {
    pool: Pool<Postgres>,
}

impl WaitlistRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get entry by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<WaitlistEntry> {
        sqlx::query_as::<_, WaitlistEntry>("SELECT * FROM waitlist_entries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Waitlist entry with id {} not found", id)))
    }

    /// Join the queue for an item at the tail position.
    ///
    /// The item row lock serializes queue mutations per item so two
    /// concurrent joins cannot claim the same position; the partial unique
    /// index on live (user, item) pairs rejects duplicates.
    pub async fn join(&self, user_id: i32, item_id: i32) -> AppResult<WaitlistEntry> {
        let mut tx = self.pool.begin().await?;

        let item = items::lock_item(&mut tx, item_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", item_id)))?;

        if !item.is_active {
            return Err(AppError::NotFound(format!("Item with id {} not found", item_id)));
        }

        let position: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(queue_position), 0) + 1 FROM waitlist_entries \
             WHERE item_id = $1 AND status IN ('waiting', 'notified')",
        )
        .bind(item_id)
        .fetch_one(&mut *tx)
        .await?;

        let entry = sqlx::query_as::<_, WaitlistEntry>(
            r#"
            INSERT INTO waitlist_entries (user_id, item_id, queue_position, status)
            VALUES ($1, $2, $3, 'waiting')
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(item_id)
        .bind(position)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if crate::repository::is_unique_violation(&e) {
                AppError::Conflict("Already on the waitlist for this item".to_string())
            } else {
                e.into()
            }
        })?;

        tx.commit().await?;
        Ok(entry)
    }

    /// List a user's live entries
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<WaitlistEntry>> {
        let entries = sqlx::query_as::<_, WaitlistEntry>(
            "SELECT * FROM waitlist_entries WHERE user_id = $1 AND status IN ('waiting', 'notified') \
             ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    /// Full live queue for an item, head first (staff view)
    pub async fn list_for_item(&self, item_id: i32) -> AppResult<Vec<WaitlistEntry>> {
        let entries = sqlx::query_as::<_, WaitlistEntry>(
            "SELECT * FROM waitlist_entries WHERE item_id = $1 AND status IN ('waiting', 'notified') \
             ORDER BY queue_position",
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    /// Take an entry out of the queue and close the gap behind it
    pub async fn remove_and_renumber(
        &self,
        entry: &WaitlistEntry,
        new_status: WaitlistStatus,
    ) -> AppResult<WaitlistEntry> {
        let mut tx = self.pool.begin().await?;

        // Same lock order as every other queue mutation: item row first
        items::lock_item(&mut tx, entry.item_id).await?;

        let updated = sqlx::query_as::<_, WaitlistEntry>(
            "UPDATE waitlist_entries SET status = $1 \
             WHERE id = $2 AND status IN ('waiting', 'notified') RETURNING *",
        )
        .bind(new_status)
        .bind(entry.id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::BadRequest("Waitlist entry is no longer queued".to_string()))?;

        sqlx::query(
            "UPDATE waitlist_entries SET queue_position = queue_position - 1 \
             WHERE item_id = $1 AND status IN ('waiting', 'notified') AND queue_position > $2",
        )
        .bind(entry.item_id)
        .bind(updated.queue_position)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Notified entries whose claim window has lapsed
    pub async fn expired_entries(&self, now: DateTime<Utc>) -> AppResult<Vec<WaitlistEntry>> {
        let entries = sqlx::query_as::<_, WaitlistEntry>(
            "SELECT * FROM waitlist_entries WHERE status = 'notified' AND expires_at < $1",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    /// Notify the queue head for an item if a unit is free.
    ///
    /// Locks the item row, recomputes availability under the lock, and flips
    /// the head from waiting to notified with a claim window. Returns `None`
    /// when there is nothing to promote (no free unit, no waiting head, or
    /// the item is not lendable right now).
    pub async fn promote_head(
        &self,
        item_id: i32,
        now: DateTime<Utc>,
        hold_hours: i64,
    ) -> AppResult<Option<WaitlistEntry>> {
        let mut tx = self.pool.begin().await?;

        let item = match items::lock_item(&mut tx, item_id).await? {
            Some(item) if item.is_active && item.status.is_lendable() => item,
            _ => return Ok(None),
        };

        let available = items::available_quantity(&mut tx, item.id).await?;
        if available <= 0 {
            return Ok(None);
        }

        let head = sqlx::query(
            "SELECT id FROM waitlist_entries \
             WHERE item_id = $1 AND queue_position = 1 AND status = 'waiting' FOR UPDATE",
        )
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?;

        let head_id: i32 = match head {
            Some(row) => row.get("id"),
            None => return Ok(None),
        };

        let notified = sqlx::query_as::<_, WaitlistEntry>(
            r#"
            UPDATE waitlist_entries
            SET status = 'notified', notified_at = $1, expires_at = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(now)
        .bind(now + chrono::Duration::hours(hold_hours))
        .bind(head_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(notified))
    }

    /// Items whose queue head is still waiting (candidates for promotion)
    pub async fn items_with_waiting_head(&self) -> AppResult<Vec<i32>> {
        let ids: Vec<i32> = sqlx::query_scalar(
            "SELECT DISTINCT item_id FROM waitlist_entries \
             WHERE status = 'waiting' AND queue_position = 1",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    /// Count waiting entries (for the dashboard)
    pub async fn count_waiting(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM waitlist_entries WHERE status = 'waiting'")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
