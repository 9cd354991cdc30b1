//! Data models for the C.A.M.P. server

pub mod borrowal;
pub mod enums;
pub mod facility;
pub mod fine;
pub mod item;
pub mod notification;
pub mod reservation;
pub mod user;
pub mod waitlist;

// Re-export commonly used types
pub use borrowal::Borrowal;
pub use enums::{
    BorrowalStatus, FineReason, FineStatus, ItemCategory, ItemStatus, NotificationKind,
    NotificationPriority, ReservationStatus, UserRole, WaitlistStatus,
};
pub use facility::Facility;
pub use fine::Fine;
pub use item::Item;
pub use notification::Notification;
pub use reservation::Reservation;
pub use user::User;
pub use waitlist::WaitlistEntry;
