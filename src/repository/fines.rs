//! Fines repository for database operations

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::fine::{CreateFine, Fine, FineQuery},
};

#[derive(Clone)]
pub struct FinesRepository {
    pool: Pool<Postgres>,
}

impl FinesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get fine by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Fine> {
        sqlx::query_as::<_, Fine>("SELECT * FROM fines WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Fine with id {} not found", id)))
    }

    /// List fines with filters
    pub async fn list(&self, query: &FineQuery) -> AppResult<Vec<Fine>> {
        let mut conditions = vec!["TRUE".to_string()];
        let mut idx = 0;

        if query.user_id.is_some() {
            idx += 1;
            conditions.push(format!("user_id = ${}", idx));
        }
        if query.status.is_some() {
            idx += 1;
            conditions.push(format!("status = ${}", idx));
        }

        let sql = format!(
            "SELECT * FROM fines WHERE {} ORDER BY created_at DESC",
            conditions.join(" AND ")
        );

        let mut builder = sqlx::query_as::<_, Fine>(&sql);
        if let Some(user_id) = query.user_id {
            builder = builder.bind(user_id);
        }
        if let Some(status) = query.status {
            builder = builder.bind(status);
        }

        Ok(builder.fetch_all(&self.pool).await?)
    }

    /// Create a fine (staff action)
    pub async fn create(&self, data: &CreateFine) -> AppResult<Fine> {
        let fine = sqlx::query_as::<_, Fine>(
            r#"
            INSERT INTO fines (user_id, borrowal_id, item_id, amount, reason, status)
            VALUES ($1, $2, $3, $4, $5, 'pending')
            RETURNING *
            "#,
        )
        .bind(data.user_id)
        .bind(data.borrowal_id)
        .bind(data.item_id)
        .bind(data.amount)
        .bind(data.reason)
        .fetch_one(&self.pool)
        .await?;
        Ok(fine)
    }

    /// The single late-return fine attached to a borrowal, if any
    pub async fn get_late_return_for_borrowal(&self, borrowal_id: i32) -> AppResult<Option<Fine>> {
        let fine = sqlx::query_as::<_, Fine>(
            "SELECT * FROM fines WHERE borrowal_id = $1 AND reason = 'late-return'",
        )
        .bind(borrowal_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(fine)
    }

    /// Create the late-return fine for a borrowal. A partial unique index on
    /// (borrowal_id) for late-return fines makes a concurrent duplicate a
    /// unique violation rather than a second fine.
    pub async fn create_late_return(
        &self,
        user_id: i32,
        borrowal_id: i32,
        item_id: i32,
        amount: Decimal,
    ) -> AppResult<Fine> {
        let fine = sqlx::query_as::<_, Fine>(
            r#"
            INSERT INTO fines (user_id, borrowal_id, item_id, amount, reason, status)
            VALUES ($1, $2, $3, $4, 'late-return', 'pending')
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(borrowal_id)
        .bind(item_id)
        .bind(amount)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if crate::repository::is_unique_violation(&e) {
                AppError::Conflict(format!(
                    "Late-return fine already exists for borrowal {}",
                    borrowal_id
                ))
            } else {
                e.into()
            }
        })?;
        Ok(fine)
    }

    /// Correct the amount of a still-pending fine; paid or waived fines are
    /// left untouched
    pub async fn update_pending_amount(&self, id: i32, amount: Decimal) -> AppResult<()> {
        sqlx::query(
            "UPDATE fines SET amount = $1, updated_at = $2 WHERE id = $3 AND status = 'pending'",
        )
        .bind(amount)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Settle a fine.
    ///
    /// For campus-cash the user's balance row is locked, checked and debited
    /// in the same transaction that marks the fine paid; the guarded UPDATE
    /// on status makes a concurrent double payment impossible.
    pub async fn pay(&self, fine: &Fine, method: &str, receipt_number: &str) -> AppResult<Fine> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        if method == "campus-cash" {
            let balance: Decimal = sqlx::query_scalar(
                "SELECT campus_cash_balance FROM users WHERE id = $1 FOR UPDATE",
            )
            .bind(fine.user_id)
            .fetch_one(&mut *tx)
            .await?;

            if balance < fine.amount {
                return Err(AppError::BadRequest(
                    "Insufficient campus cash balance".to_string(),
                ));
            }

            sqlx::query(
                "UPDATE users SET campus_cash_balance = campus_cash_balance - $1, updated_at = $2 WHERE id = $3",
            )
            .bind(fine.amount)
            .bind(now)
            .bind(fine.user_id)
            .execute(&mut *tx)
            .await?;
        }

        let paid = sqlx::query_as::<_, Fine>(
            r#"
            UPDATE fines
            SET status = 'paid', paid_at = $1, payment_method = $2, receipt_number = $3, updated_at = $1
            WHERE id = $4 AND status IN ('pending', 'appealed')
            RETURNING *
            "#,
        )
        .bind(now)
        .bind(method)
        .bind(receipt_number)
        .bind(fine.id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::Conflict("Fine is no longer payable".to_string()))?;

        tx.commit().await?;
        Ok(paid)
    }

    /// Waive a pending fine
    pub async fn waive(&self, id: i32) -> AppResult<Fine> {
        sqlx::query_as::<_, Fine>(
            "UPDATE fines SET status = 'waived', updated_at = $1 WHERE id = $2 AND status = 'pending' RETURNING *",
        )
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::BadRequest("Only pending fines can be waived".to_string()))
    }

    /// Pending fine count and total outstanding amount (for the dashboard)
    pub async fn pending_summary(&self) -> AppResult<(i64, Decimal)> {
        let row: (i64, Decimal) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(amount), 0) FROM fines WHERE status = 'pending'",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
