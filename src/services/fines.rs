//! Fine management service and the overdue scan.
//!
//! The scan is the idempotent core of fine accrual: it may run any number of
//! times (scheduler tick, boot-time run, overlapping instances) and always
//! converges a borrowal to `overdue` with one correctly-sized late-return
//! fine.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        borrowal::OverdueBorrowal,
        enums::{BorrowalStatus, FineStatus, ItemCategory, NotificationKind, NotificationPriority},
        fine::{CreateFine, Fine, FineQuery, PayFineRequest},
        notification::NewNotification,
        user::UserClaims,
    },
    repository::Repository,
};

/// Whole days a borrowal is past due, rounded up, never less than 1
pub fn days_overdue(now: DateTime<Utc>, due_date: DateTime<Utc>) -> i64 {
    let seconds = (now - due_date).num_seconds();
    let days = (seconds + 86_399) / 86_400;
    days.max(1)
}

/// Late fee owed for a borrowal of the given category, `days` past due
pub fn late_fee(category: ItemCategory, days: i64) -> Decimal {
    category.daily_fine_rate() * Decimal::from(days)
}

/// Generate a payment receipt number
pub fn receipt_number() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("RCT-{}", id[..12].to_uppercase())
}

/// Counters reported by one overdue scan run
#[derive(Debug, Default, Clone, Copy)]
pub struct OverdueScanOutcome {
    pub examined: usize,
    pub fines_created: usize,
    pub fines_adjusted: usize,
    pub errors: usize,
}

#[derive(Clone)]
pub struct FinesService {
    repository: Repository,
}

impl FinesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List fines; students only see their own
    pub async fn list(&self, claims: &UserClaims, mut query: FineQuery) -> AppResult<Vec<Fine>> {
        if !claims.is_staff() {
            query.user_id = Some(claims.user_id);
        }
        self.repository.fines.list(&query).await
    }

    /// Record a manual fine (staff: damage, loss, other)
    pub async fn create(&self, request: CreateFine) -> AppResult<Fine> {
        if request.amount < Decimal::ZERO {
            return Err(AppError::Validation("Fine amount must not be negative".to_string()));
        }
        self.repository.users.get_by_id(request.user_id).await?;

        let fine = self.repository.fines.create(&request).await?;

        self.repository
            .notifications
            .create(
                NewNotification::new(
                    fine.user_id,
                    NotificationKind::FineIssued,
                    "Fine issued",
                    format!("A fine of ${} ({}) has been issued to your account.", fine.amount, fine.reason),
                )
                .fine(fine.id)
                .priority(NotificationPriority::High),
            )
            .await?;

        Ok(fine)
    }

    /// Pay a fine (owner or staff).
    ///
    /// `campus-cash` debits the user's balance inside the payment
    /// transaction; any other method is recorded as settled at the desk.
    pub async fn pay(&self, claims: &UserClaims, id: i32, request: PayFineRequest) -> AppResult<Fine> {
        let fine = self.repository.fines.get_by_id(id).await?;
        claims.require_self_or_staff(fine.user_id)?;

        match fine.status {
            FineStatus::Paid => {
                return Err(AppError::BadRequest("Fine already paid".to_string()));
            }
            FineStatus::Waived => {
                return Err(AppError::BadRequest("Fine has been waived".to_string()));
            }
            FineStatus::Pending | FineStatus::Appealed => {}
        }

        let receipt = receipt_number();
        let paid = self.repository.fines.pay(&fine, &request.method, &receipt).await?;

        self.repository
            .notifications
            .create(
                NewNotification::new(
                    paid.user_id,
                    NotificationKind::FinePaid,
                    "Fine paid",
                    format!(
                        "Your fine of ${} was paid. Receipt: {}.",
                        paid.amount,
                        receipt,
                    ),
                )
                .fine(paid.id),
            )
            .await?;

        Ok(paid)
    }

    /// Waive a pending fine (staff)
    pub async fn waive(&self, id: i32) -> AppResult<Fine> {
        self.repository.fines.get_by_id(id).await?;
        self.repository.fines.waive(id).await
    }

    /// One pass over every open borrowal past its due date.
    ///
    /// Failures are contained per borrowal: the row is logged and skipped,
    /// and the next run picks it up again.
    pub async fn run_overdue_scan(&self, now: DateTime<Utc>) -> AppResult<OverdueScanOutcome> {
        let due = self.repository.borrowals.list_due_for_scan(now).await?;

        let mut outcome = OverdueScanOutcome {
            examined: due.len(),
            ..Default::default()
        };

        for borrowal in &due {
            match self.accrue_for_borrowal(borrowal, now).await {
                Ok(Accrual::Created) => outcome.fines_created += 1,
                Ok(Accrual::Adjusted) => outcome.fines_adjusted += 1,
                Ok(Accrual::Unchanged) => {}
                Err(e) => {
                    outcome.errors += 1;
                    tracing::warn!(
                        borrowal_id = borrowal.id,
                        error = %e,
                        "overdue scan: skipping borrowal"
                    );
                }
            }
        }

        Ok(outcome)
    }

    async fn accrue_for_borrowal(
        &self,
        borrowal: &OverdueBorrowal,
        now: DateTime<Utc>,
    ) -> AppResult<Accrual> {
        if borrowal.status == BorrowalStatus::Active {
            self.repository.borrowals.mark_overdue(borrowal.id).await?;
        }

        let days = days_overdue(now, borrowal.due_date);
        let expected = late_fee(borrowal.category, days);

        match self
            .repository
            .fines
            .get_late_return_for_borrowal(borrowal.id)
            .await?
        {
            None => {
                let fine = self
                    .repository
                    .fines
                    .create_late_return(borrowal.user_id, borrowal.id, borrowal.item_id, expected)
                    .await?;

                // Notify on first creation only, never on later corrections
                self.repository
                    .notifications
                    .create(
                        NewNotification::new(
                            borrowal.user_id,
                            NotificationKind::FineIssued,
                            "Overdue equipment fine",
                            format!(
                                "\"{}\" is {} day(s) overdue. A late fee of ${} has been issued.",
                                borrowal.item_name, days, fine.amount,
                            ),
                        )
                        .item(borrowal.item_id)
                        .borrowal(borrowal.id)
                        .fine(fine.id)
                        .priority(NotificationPriority::High),
                    )
                    .await?;

                Ok(Accrual::Created)
            }
            Some(fine) if fine.status == FineStatus::Pending && fine.amount != expected => {
                self.repository
                    .fines
                    .update_pending_amount(fine.id, expected)
                    .await?;
                Ok(Accrual::Adjusted)
            }
            Some(_) => Ok(Accrual::Unchanged),
        }
    }
}

enum Accrual {
    Created,
    Adjusted,
    Unchanged,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn days_overdue_rounds_up() {
        let due = t0();
        assert_eq!(days_overdue(due + Duration::hours(1), due), 1);
        assert_eq!(days_overdue(due + Duration::hours(24), due), 1);
        assert_eq!(days_overdue(due + Duration::hours(25), due), 2);
        assert_eq!(days_overdue(due + Duration::days(3), due), 3);
        assert_eq!(days_overdue(due + Duration::days(3) + Duration::minutes(1), due), 4);
    }

    #[test]
    fn days_overdue_is_at_least_one() {
        let due = t0();
        assert_eq!(days_overdue(due + Duration::seconds(1), due), 1);
        // The scan only sees rows with due_date < now, but guard anyway
        assert_eq!(days_overdue(due, due), 1);
    }

    #[test]
    fn late_fee_uses_category_rate() {
        // 3 days overdue on a camera at $5/day
        assert_eq!(late_fee(ItemCategory::Camera, 3), dec!(15.00));
        assert_eq!(late_fee(ItemCategory::Computer, 2), dec!(20.00));
        assert_eq!(late_fee(ItemCategory::Accessory, 5), dec!(10.00));
        assert_eq!(late_fee(ItemCategory::Other, 1), dec!(5.00));
    }

    #[test]
    fn receipt_numbers_are_well_formed_and_unique() {
        let a = receipt_number();
        let b = receipt_number();
        assert!(a.starts_with("RCT-"));
        assert_eq!(a.len(), 16);
        assert!(a[4..].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        assert_ne!(a, b);
    }
}
