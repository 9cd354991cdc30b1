//! Notifications repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::notification::{NewNotification, Notification},
};

#[derive(Clone)]
pub struct NotificationsRepository {
    pool: Pool<Postgres>,
}

impl NotificationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Persist a notification record
    pub async fn create(&self, data: NewNotification) -> AppResult<Notification> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications
                (user_id, kind, title, message, item_id, borrowal_id, reservation_id, fine_id, priority)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(data.user_id)
        .bind(data.kind)
        .bind(&data.title)
        .bind(&data.message)
        .bind(data.item_id)
        .bind(data.borrowal_id)
        .bind(data.reservation_id)
        .bind(data.fine_id)
        .bind(data.priority)
        .fetch_one(&self.pool)
        .await?;
        Ok(notification)
    }

    /// List a user's notifications, newest first
    pub async fn list_for_user(&self, user_id: i32, unread_only: bool) -> AppResult<Vec<Notification>> {
        let sql = if unread_only {
            "SELECT * FROM notifications WHERE user_id = $1 AND NOT is_read ORDER BY created_at DESC"
        } else {
            "SELECT * FROM notifications WHERE user_id = $1 ORDER BY created_at DESC"
        };

        let notifications = sqlx::query_as::<_, Notification>(sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(notifications)
    }

    /// Mark one of the user's notifications read
    pub async fn mark_read(&self, id: i32, user_id: i32) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Notification with id {} not found",
                id
            )));
        }
        Ok(())
    }

    /// Mark all of the user's notifications read; returns how many changed
    pub async fn mark_all_read(&self, user_id: i32) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND NOT is_read",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
