//! Inventory service: equipment items and the facilities that own them

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        facility::{CreateFacility, Facility, UpdateFacility},
        item::{CreateItem, Item, ItemQuery, UpdateItem},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct InventoryService {
    repository: Repository,
}

impl InventoryService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Search items with computed availability
    pub async fn list_items(&self, query: &ItemQuery) -> AppResult<(Vec<Item>, i64)> {
        self.repository.items.list(query).await
    }

    /// Get one item with computed availability
    pub async fn get_item(&self, id: i32) -> AppResult<Item> {
        self.repository.items.get_by_id(id).await
    }

    /// Create an item
    pub async fn create_item(&self, data: CreateItem) -> AppResult<Item> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if let Some(facility_id) = data.facility_id {
            self.repository.facilities.get_by_id(facility_id).await?;
        }
        self.repository.items.create(&data).await
    }

    /// Update an item
    pub async fn update_item(&self, id: i32, data: UpdateItem) -> AppResult<Item> {
        if let Some(quantity) = data.quantity {
            if quantity < 1 {
                return Err(AppError::Validation("Quantity must be at least 1".to_string()));
            }
        }
        if let Some(facility_id) = data.facility_id {
            self.repository.facilities.get_by_id(facility_id).await?;
        }
        self.repository.items.update(id, &data).await
    }

    /// Soft-delete an item
    pub async fn delete_item(&self, id: i32, force: bool) -> AppResult<()> {
        self.repository.items.soft_delete(id, force).await
    }

    /// List facilities
    pub async fn list_facilities(&self) -> AppResult<Vec<Facility>> {
        self.repository.facilities.list().await
    }

    /// Create a facility
    pub async fn create_facility(&self, data: CreateFacility) -> AppResult<Facility> {
        if data.name.trim().is_empty() {
            return Err(AppError::Validation("Facility name must not be empty".to_string()));
        }
        self.repository.facilities.create(&data).await
    }

    /// Update a facility
    pub async fn update_facility(&self, id: i32, data: UpdateFacility) -> AppResult<Facility> {
        self.repository.facilities.update(id, &data).await
    }
}
