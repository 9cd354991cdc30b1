//! Users repository for database operations

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::UserRole,
        user::{User, UserQuery},
    },
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Get user by login, if any
    pub async fn get_by_login(&self, login: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE login = $1")
            .bind(login)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Create a user with an already-hashed password
    pub async fn create(
        &self,
        login: &str,
        password_hash: &str,
        firstname: Option<&str>,
        lastname: Option<&str>,
        email: Option<&str>,
        role: UserRole,
    ) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (login, password, firstname, lastname, email, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(login)
        .bind(password_hash)
        .bind(firstname)
        .bind(lastname)
        .bind(email)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if crate::repository::is_unique_violation(&e) {
                AppError::Conflict("Login or email already registered".to_string())
            } else {
                e.into()
            }
        })?;
        Ok(user)
    }

    /// List users with name search and pagination
    pub async fn list(&self, query: &UserQuery) -> AppResult<(Vec<User>, i64)> {
        let mut conditions = vec!["status != 2".to_string()];
        let mut idx = 0;

        if query.name.is_some() {
            idx += 1;
            conditions.push(format!(
                "(login ILIKE ${0} OR firstname ILIKE ${0} OR lastname ILIKE ${0})",
                idx
            ));
        }
        if query.role.is_some() {
            idx += 1;
            conditions.push(format!("role = ${}", idx));
        }

        let where_clause = conditions.join(" AND ");
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

        let list_sql = format!(
            "SELECT * FROM users WHERE {} ORDER BY login LIMIT ${} OFFSET ${}",
            where_clause,
            idx + 1,
            idx + 2
        );
        let count_sql = format!("SELECT COUNT(*) FROM users WHERE {}", where_clause);

        macro_rules! bind_filters {
            ($builder:expr) => {{
                let mut b = $builder;
                if let Some(ref name) = query.name {
                    b = b.bind(format!("%{}%", name));
                }
                if let Some(role) = query.role {
                    b = b.bind(role);
                }
                b
            }};
        }

        let users = bind_filters!(sqlx::query_as::<_, User>(&list_sql))
            .bind(per_page)
            .bind((page - 1) * per_page)
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = bind_filters!(sqlx::query_scalar(&count_sql))
            .fetch_one(&self.pool)
            .await?;

        Ok((users, total))
    }

    /// Credit a user's campus cash balance
    pub async fn top_up(&self, id: i32, amount: Decimal) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET campus_cash_balance = campus_cash_balance + $1, updated_at = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(amount)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Count non-deleted users (for the dashboard)
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE status != 2")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
