//! Items repository for database operations.
//!
//! Availability is a single SQL expression over open borrowals and
//! capacity-holding reservations; item rows never store a derived count.

use chrono::Utc;
use sqlx::{Pool, Postgres, Row, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::ItemStatus,
        item::{CreateItem, Item, ItemQuery, UpdateItem},
    },
};

/// Units free right now for the item aliased `i`, floored at 0
pub(crate) const AVAILABLE_EXPR: &str = "GREATEST(0, i.quantity \
    - (SELECT COUNT(*) FROM borrowals b \
       WHERE b.item_id = i.id AND b.status IN ('active', 'overdue')) \
    - (SELECT COUNT(*) FROM reservations r \
       WHERE r.item_id = i.id AND r.status IN ('pending', 'confirmed')))::int";

/// Compute availability for one item inside a transaction (e.g. while the
/// item row is locked)
pub(crate) async fn available_quantity(
    tx: &mut Transaction<'_, Postgres>,
    item_id: i32,
) -> AppResult<i32> {
    let q = format!(
        "SELECT {} AS available_quantity FROM items i WHERE i.id = $1",
        AVAILABLE_EXPR
    );
    let available: i32 = sqlx::query_scalar(&q)
        .bind(item_id)
        .fetch_one(&mut **tx)
        .await?;
    Ok(available)
}

/// Item core fields fetched under a row lock during admission decisions
#[derive(Debug)]
pub(crate) struct LockedItem {
    pub id: i32,
    pub quantity: i32,
    pub status: ItemStatus,
    pub is_active: bool,
}

/// Lock the item row for the duration of the transaction and return the
/// fields admission checks need. `None` when the item does not exist.
pub(crate) async fn lock_item(
    tx: &mut Transaction<'_, Postgres>,
    item_id: i32,
) -> AppResult<Option<LockedItem>> {
    let row = sqlx::query("SELECT id, quantity, status, is_active FROM items WHERE id = $1 FOR UPDATE")
        .bind(item_id)
        .fetch_optional(&mut **tx)
        .await?;

    Ok(row.map(|r| LockedItem {
        id: r.get("id"),
        quantity: r.get("quantity"),
        status: r.get("status"),
        is_active: r.get("is_active"),
    }))
}

#[derive(Clone)]
pub struct ItemsRepository {
    pool: Pool<Postgres>,
}

impl ItemsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get item by ID with computed availability
    pub async fn get_by_id(&self, id: i32) -> AppResult<Item> {
        let q = format!(
            "SELECT i.*, {} AS available_quantity FROM items i WHERE i.id = $1",
            AVAILABLE_EXPR
        );
        sqlx::query_as::<_, Item>(&q)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", id)))
    }

    /// List items with filters and pagination
    pub async fn list(&self, query: &ItemQuery) -> AppResult<(Vec<Item>, i64)> {
        let mut conditions = Vec::new();
        let mut idx = 0;

        if !query.include_inactive.unwrap_or(false) {
            conditions.push("i.is_active = TRUE".to_string());
        }
        if query.category.is_some() {
            idx += 1;
            conditions.push(format!("i.category = ${}", idx));
        }
        if query.facility_id.is_some() {
            idx += 1;
            conditions.push(format!("i.facility_id = ${}", idx));
        }
        if query.status.is_some() {
            idx += 1;
            conditions.push(format!("i.status = ${}", idx));
        }
        if query.search.is_some() {
            idx += 1;
            conditions.push(format!(
                "(i.name ILIKE ${0} OR i.asset_tag ILIKE ${0})",
                idx
            ));
        }

        let where_clause = if conditions.is_empty() {
            "TRUE".to_string()
        } else {
            conditions.join(" AND ")
        };

        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

        let list_sql = format!(
            "SELECT i.*, {} AS available_quantity FROM items i WHERE {} ORDER BY i.name LIMIT ${} OFFSET ${}",
            AVAILABLE_EXPR,
            where_clause,
            idx + 1,
            idx + 2
        );
        let count_sql = format!("SELECT COUNT(*) FROM items i WHERE {}", where_clause);

        macro_rules! bind_filters {
            ($builder:expr) => {{
                let mut b = $builder;
                if let Some(category) = query.category {
                    b = b.bind(category);
                }
                if let Some(facility_id) = query.facility_id {
                    b = b.bind(facility_id);
                }
                if let Some(status) = query.status {
                    b = b.bind(status);
                }
                if let Some(ref search) = query.search {
                    b = b.bind(format!("%{}%", search));
                }
                b
            }};
        }

        let items = bind_filters!(sqlx::query_as::<_, Item>(&list_sql))
            .bind(per_page)
            .bind((page - 1) * per_page)
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = bind_filters!(sqlx::query_scalar(&count_sql))
            .fetch_one(&self.pool)
            .await?;

        Ok((items, total))
    }

    /// Create a new item
    pub async fn create(&self, data: &CreateItem) -> AppResult<Item> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO items (name, category, facility_id, quantity, condition, asset_tag, serial_number)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&data.name)
        .bind(data.category)
        .bind(data.facility_id)
        .bind(data.quantity.unwrap_or(1))
        .bind(&data.condition)
        .bind(&data.asset_tag)
        .bind(&data.serial_number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if crate::repository::is_unique_violation(&e) {
                AppError::Conflict("An item with this asset tag or serial number already exists".to_string())
            } else {
                e.into()
            }
        })?;

        self.get_by_id(id).await
    }

    /// Update an existing item (partial update)
    pub async fn update(&self, id: i32, data: &UpdateItem) -> AppResult<Item> {
        let now = Utc::now();
        let mut sets = vec!["updated_at = $1".to_string()];
        let mut idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.name, "name");
        add_field!(data.category, "category");
        add_field!(data.facility_id, "facility_id");
        add_field!(data.quantity, "quantity");
        add_field!(data.condition, "condition");
        add_field!(data.serial_number, "serial_number");
        add_field!(data.status, "status");

        let query = format!(
            "UPDATE items SET {} WHERE id = ${} RETURNING id",
            sets.join(", "),
            idx
        );

        let mut builder = sqlx::query_scalar::<_, i32>(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.name);
        bind_field!(data.category);
        bind_field!(data.facility_id);
        bind_field!(data.quantity);
        bind_field!(data.condition);
        bind_field!(data.serial_number);
        bind_field!(data.status);

        let updated = builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", id)))?;

        self.get_by_id(updated).await
    }

    /// Soft-delete an item. Refused while borrowals are open unless forced.
    pub async fn soft_delete(&self, id: i32, force: bool) -> AppResult<()> {
        let open: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrowals WHERE item_id = $1 AND status IN ('active', 'overdue')",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        if open > 0 && !force {
            return Err(AppError::Conflict(format!(
                "Item has {} open borrowals",
                open
            )));
        }

        let result = sqlx::query("UPDATE items SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Item with id {} not found", id)));
        }
        Ok(())
    }

    /// Count active catalog items (for the dashboard)
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items WHERE is_active = TRUE")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
