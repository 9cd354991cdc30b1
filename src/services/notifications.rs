//! Notification inbox service

use crate::{
    error::AppResult,
    models::{notification::Notification, user::UserClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct NotificationsService {
    repository: Repository,
}

impl NotificationsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List the caller's notifications
    pub async fn list(&self, claims: &UserClaims, unread_only: bool) -> AppResult<Vec<Notification>> {
        self.repository
            .notifications
            .list_for_user(claims.user_id, unread_only)
            .await
    }

    /// Mark one of the caller's notifications read
    pub async fn mark_read(&self, claims: &UserClaims, id: i32) -> AppResult<()> {
        self.repository.notifications.mark_read(id, claims.user_id).await
    }

    /// Mark all of the caller's notifications read; returns how many changed
    pub async fn mark_all_read(&self, claims: &UserClaims) -> AppResult<u64> {
        self.repository.notifications.mark_all_read(claims.user_id).await
    }
}
