//! Dashboard statistics service

use crate::{
    api::dashboard::{BorrowalCounts, DashboardResponse, FineCounts},
    error::AppResult,
    repository::Repository,
};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Live platform counts for the staff dashboard
    pub async fn dashboard(&self) -> AppResult<DashboardResponse> {
        let items = self.repository.items.count_active().await?;
        let users = self.repository.users.count().await?;
        let active_borrowals = self.repository.borrowals.count_active().await?;
        let overdue_borrowals = self.repository.borrowals.count_overdue().await?;
        let open_reservations = self.repository.reservations.count_open().await?;
        let (pending_fines, pending_amount) = self.repository.fines.pending_summary().await?;
        let waiting = self.repository.waitlist.count_waiting().await?;

        Ok(DashboardResponse {
            items,
            users,
            borrowals: BorrowalCounts {
                active: active_borrowals,
                overdue: overdue_borrowals,
            },
            open_reservations,
            fines: FineCounts {
                pending: pending_fines,
                pending_amount,
            },
            waitlist_waiting: waiting,
        })
    }
}
