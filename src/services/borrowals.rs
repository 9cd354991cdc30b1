//! Borrowal (checkout/return/renewal) service

use chrono::{Duration, Utc};

use crate::{
    config::LendingConfig,
    error::{AppError, AppResult},
    models::{
        borrowal::{Borrowal, BorrowalQuery, CheckoutRequest, ReturnRequest},
        enums::NotificationKind,
        notification::NewNotification,
        user::UserClaims,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BorrowalsService {
    repository: Repository,
    lending: LendingConfig,
}

impl BorrowalsService {
    pub fn new(repository: Repository, lending: LendingConfig) -> Self {
        Self { repository, lending }
    }

    /// Check out one unit of an item to a user (staff desk operation)
    pub async fn checkout(&self, request: CheckoutRequest) -> AppResult<Borrowal> {
        let now = Utc::now();

        // Verify user and item exist before the admission transaction
        self.repository.users.get_by_id(request.user_id).await?;
        let item = self.repository.items.get_by_id(request.item_id).await?;

        let due_date = match request.due_date {
            Some(due) => {
                if due <= now {
                    return Err(AppError::BadRequest("Due date must be in the future".to_string()));
                }
                due
            }
            None => now + Duration::days(self.lending.loan_period_days),
        };

        let borrowal = self
            .repository
            .borrowals
            .checkout(request.user_id, request.item_id, due_date)
            .await?;

        self.repository
            .notifications
            .create(
                NewNotification::new(
                    borrowal.user_id,
                    NotificationKind::CheckoutReceipt,
                    "Equipment checked out",
                    format!(
                        "You checked out \"{}\". It is due back on {}.",
                        item.name,
                        borrowal.due_date.format("%Y-%m-%d %H:%M UTC"),
                    ),
                )
                .item(item.id)
                .borrowal(borrowal.id),
            )
            .await?;

        Ok(borrowal)
    }

    /// Return a borrowed item (staff desk operation).
    ///
    /// The caller is expected to run waitlist promotion for the item
    /// afterwards, so a freed unit is offered to the queue head without
    /// waiting for the next scan.
    pub async fn return_borrowal(&self, id: i32, request: ReturnRequest) -> AppResult<Borrowal> {
        let borrowal = self
            .repository
            .borrowals
            .return_borrowal(id, request.condition.as_deref())
            .await?;

        self.repository
            .notifications
            .create(
                NewNotification::new(
                    borrowal.user_id,
                    NotificationKind::ReturnReceipt,
                    "Equipment returned",
                    "Your borrowed equipment was returned. Thank you.".to_string(),
                )
                .item(borrowal.item_id)
                .borrowal(borrowal.id),
            )
            .await?;

        Ok(borrowal)
    }

    /// Extend an active borrowal by the fixed renewal period (owner or staff)
    pub async fn renew(&self, claims: &UserClaims, id: i32) -> AppResult<Borrowal> {
        let borrowal = self.repository.borrowals.get_by_id(id).await?;
        claims.require_self_or_staff(borrowal.user_id)?;

        self.repository
            .borrowals
            .renew(id, self.lending.renewal_period_days)
            .await
    }

    /// List borrowals; students only see their own
    pub async fn list(&self, claims: &UserClaims, mut query: BorrowalQuery) -> AppResult<Vec<Borrowal>> {
        if !claims.is_staff() {
            query.user_id = Some(claims.user_id);
        }
        self.repository.borrowals.list(&query).await
    }

    /// Get one borrowal (owner or staff)
    pub async fn get(&self, claims: &UserClaims, id: i32) -> AppResult<Borrowal> {
        let borrowal = self.repository.borrowals.get_by_id(id).await?;
        claims.require_self_or_staff(borrowal.user_id)?;
        Ok(borrowal)
    }
}
