//! Repository layer for database operations

pub mod borrowals;
pub mod facilities;
pub mod fines;
pub mod items;
pub mod notifications;
pub mod reservations;
pub mod users;
pub mod waitlist;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub facilities: facilities::FacilitiesRepository,
    pub items: items::ItemsRepository,
    pub borrowals: borrowals::BorrowalsRepository,
    pub reservations: reservations::ReservationsRepository,
    pub fines: fines::FinesRepository,
    pub waitlist: waitlist::WaitlistRepository,
    pub notifications: notifications::NotificationsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            facilities: facilities::FacilitiesRepository::new(pool.clone()),
            items: items::ItemsRepository::new(pool.clone()),
            borrowals: borrowals::BorrowalsRepository::new(pool.clone()),
            reservations: reservations::ReservationsRepository::new(pool.clone()),
            fines: fines::FinesRepository::new(pool.clone()),
            waitlist: waitlist::WaitlistRepository::new(pool.clone()),
            notifications: notifications::NotificationsRepository::new(pool.clone()),
            pool,
        }
    }
}

/// Postgres unique-constraint violation (SQLSTATE 23505)
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}
