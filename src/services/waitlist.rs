//! Waitlist service: queue membership and promotion.
//!
//! Promotion runs in two places with the same semantics: immediately after
//! an item return, and from the periodic scan as the catch-all (covering
//! cancellations, expired claim windows and quantity changes).

use chrono::{DateTime, Utc};

use crate::{
    config::LendingConfig,
    error::AppResult,
    models::{
        enums::{NotificationKind, NotificationPriority, WaitlistStatus},
        notification::NewNotification,
        user::UserClaims,
        waitlist::{JoinWaitlistRequest, WaitlistEntry, WaitlistQuery},
    },
    repository::Repository,
};

/// Counters reported by one promotion scan run
#[derive(Debug, Default, Clone, Copy)]
pub struct WaitlistScanOutcome {
    pub expired: usize,
    pub notified: usize,
    pub errors: usize,
}

#[derive(Clone)]
pub struct WaitlistService {
    repository: Repository,
    lending: LendingConfig,
}

impl WaitlistService {
    pub fn new(repository: Repository, lending: LendingConfig) -> Self {
        Self { repository, lending }
    }

    /// Join the queue for an item
    pub async fn join(&self, user_id: i32, request: JoinWaitlistRequest) -> AppResult<WaitlistEntry> {
        self.repository.waitlist.join(user_id, request.item_id).await
    }

    /// Leave the queue (owner or staff); later entries move up one position
    pub async fn leave(&self, claims: &UserClaims, id: i32) -> AppResult<WaitlistEntry> {
        let entry = self.repository.waitlist.get_by_id(id).await?;
        claims.require_self_or_staff(entry.user_id)?;

        self.repository
            .waitlist
            .remove_and_renumber(&entry, WaitlistStatus::Cancelled)
            .await
    }

    /// List waitlist entries: a full item queue for staff, otherwise the
    /// caller's own entries
    pub async fn list(&self, claims: &UserClaims, query: WaitlistQuery) -> AppResult<Vec<WaitlistEntry>> {
        match query.item_id {
            Some(item_id) if claims.is_staff() => self.repository.waitlist.list_for_item(item_id).await,
            _ => self.repository.waitlist.list_for_user(claims.user_id).await,
        }
    }

    /// Offer a freed unit to the queue head of one item, if it is both
    /// available and still headed by a waiting entry. Called on item return
    /// and from the scan.
    pub async fn promote_for_item(&self, item_id: i32) -> AppResult<Option<WaitlistEntry>> {
        let now = Utc::now();
        let entry = self
            .repository
            .waitlist
            .promote_head(item_id, now, self.lending.reservation_hold_hours)
            .await?;

        if let Some(ref entry) = entry {
            let expires = entry
                .expires_at
                .map(|e| e.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_default();

            self.repository
                .notifications
                .create(
                    NewNotification::new(
                        entry.user_id,
                        NotificationKind::ItemAvailable,
                        "Equipment available",
                        format!(
                            "An item you are waiting for is now available. Claim it before {}.",
                            expires,
                        ),
                    )
                    .item(entry.item_id)
                    .priority(NotificationPriority::High),
                )
                .await?;
        }

        Ok(entry)
    }

    /// One pass of waitlist maintenance: lapse overdue claim windows, then
    /// offer free units to queue heads. Failures are contained per entry.
    pub async fn run_promotion_scan(&self, now: DateTime<Utc>) -> AppResult<WaitlistScanOutcome> {
        let mut outcome = WaitlistScanOutcome::default();

        for entry in self.repository.waitlist.expired_entries(now).await? {
            match self
                .repository
                .waitlist
                .remove_and_renumber(&entry, WaitlistStatus::Expired)
                .await
            {
                Ok(_) => outcome.expired += 1,
                Err(e) => {
                    outcome.errors += 1;
                    tracing::warn!(
                        entry_id = entry.id,
                        error = %e,
                        "waitlist scan: failed to expire entry"
                    );
                }
            }
        }

        for item_id in self.repository.waitlist.items_with_waiting_head().await? {
            match self.promote_for_item(item_id).await {
                Ok(Some(_)) => outcome.notified += 1,
                Ok(None) => {}
                Err(e) => {
                    outcome.errors += 1;
                    tracing::warn!(
                        item_id,
                        error = %e,
                        "waitlist scan: failed to promote queue head"
                    );
                }
            }
        }

        Ok(outcome)
    }
}
