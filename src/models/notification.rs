//! In-app notification model.
//!
//! Notifications are persisted records only; there is no external delivery
//! channel. They never drive further workflow logic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::enums::{NotificationKind, NotificationPriority};

/// Notification record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Notification {
    pub id: i32,
    pub user_id: i32,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub item_id: Option<i32>,
    pub borrowal_id: Option<i32>,
    pub reservation_id: Option<i32>,
    pub fine_id: Option<i32>,
    pub priority: NotificationPriority,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a notification from a workflow
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: i32,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub item_id: Option<i32>,
    pub borrowal_id: Option<i32>,
    pub reservation_id: Option<i32>,
    pub fine_id: Option<i32>,
    pub priority: NotificationPriority,
}

impl NewNotification {
    pub fn new(user_id: i32, kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            user_id,
            kind,
            title: title.into(),
            message: message.into(),
            item_id: None,
            borrowal_id: None,
            reservation_id: None,
            fine_id: None,
            priority: NotificationPriority::Normal,
        }
    }

    pub fn item(mut self, item_id: i32) -> Self {
        self.item_id = Some(item_id);
        self
    }

    pub fn borrowal(mut self, borrowal_id: i32) -> Self {
        self.borrowal_id = Some(borrowal_id);
        self
    }

    pub fn reservation(mut self, reservation_id: i32) -> Self {
        self.reservation_id = Some(reservation_id);
        self
    }

    pub fn fine(mut self, fine_id: i32) -> Self {
        self.fine_id = Some(fine_id);
        self
    }

    pub fn priority(mut self, priority: NotificationPriority) -> Self {
        self.priority = priority;
        self
    }
}

/// Notification list query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct NotificationQuery {
    pub unread_only: Option<bool>,
}
