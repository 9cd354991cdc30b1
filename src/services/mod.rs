//! Business logic services

pub mod borrowals;
pub mod fines;
pub mod inventory;
pub mod notifications;
pub mod reservations;
pub mod stats;
pub mod users;
pub mod waitlist;

use crate::{
    config::{AuthConfig, LendingConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pool: sqlx::Pool<sqlx::Postgres>,
    pub users: users::UsersService,
    pub inventory: inventory::InventoryService,
    pub borrowals: borrowals::BorrowalsService,
    pub reservations: reservations::ReservationsService,
    pub fines: fines::FinesService,
    pub waitlist: waitlist::WaitlistService,
    pub notifications: notifications::NotificationsService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig, lending: LendingConfig) -> Self {
        Self {
            pool: repository.pool.clone(),
            users: users::UsersService::new(repository.clone(), auth_config),
            inventory: inventory::InventoryService::new(repository.clone()),
            borrowals: borrowals::BorrowalsService::new(repository.clone(), lending.clone()),
            reservations: reservations::ReservationsService::new(repository.clone(), lending.clone()),
            fines: fines::FinesService::new(repository.clone()),
            waitlist: waitlist::WaitlistService::new(repository.clone(), lending),
            notifications: notifications::NotificationsService::new(repository.clone()),
            stats: stats::StatsService::new(repository),
        }
    }

    /// Database pool handle, for readiness probes
    pub fn pool(&self) -> sqlx::Pool<sqlx::Postgres> {
        self.pool.clone()
    }
}
