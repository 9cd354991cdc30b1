//! Reservation management service

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::{
    config::LendingConfig,
    error::{AppError, AppResult},
    models::{
        enums::{NotificationKind, ReservationStatus},
        notification::NewNotification,
        reservation::{
            CreateReservation, Reservation, ReservationQuery, ReservationWindow,
            SlotAvailability, SlotsResponse,
        },
        user::UserClaims,
    },
    repository::Repository,
};

/// Half-open interval overlap: `[a_start, a_end)` intersects `[b_start, b_end)`
pub fn windows_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Units left for a pickup window given the capacity-holding reservations
/// already on the books, floored at 0
pub fn slot_remaining(
    windows: &[ReservationWindow],
    slot_start: DateTime<Utc>,
    slot_end: DateTime<Utc>,
    quantity: i32,
) -> i32 {
    let taken = windows
        .iter()
        .filter(|w| windows_overlap(w.pickup_date, w.expiry_date, slot_start, slot_end))
        .count() as i32;
    (quantity - taken).max(0)
}

#[derive(Clone)]
pub struct ReservationsService {
    repository: Repository,
    lending: LendingConfig,
}

impl ReservationsService {
    pub fn new(repository: Repository, lending: LendingConfig) -> Self {
        Self { repository, lending }
    }

    /// Reserve one unit of an item for a pickup window
    pub async fn create(&self, user_id: i32, request: CreateReservation) -> AppResult<Reservation> {
        let now = Utc::now();
        let grace = Duration::minutes(self.lending.pickup_grace_minutes);

        if request.pickup_date < now - grace {
            return Err(AppError::BadRequest("Pickup date is in the past".to_string()));
        }

        // Fetched outside the admission transaction: friendly 404 plus the
        // name for the confirmation message
        let item = self.repository.items.get_by_id(request.item_id).await?;

        let expiry_date = request.pickup_date + Duration::hours(self.lending.reservation_hold_hours);
        let reservation = self
            .repository
            .reservations
            .reserve(user_id, request.item_id, request.pickup_date, expiry_date)
            .await?;

        self.repository
            .notifications
            .create(
                NewNotification::new(
                    user_id,
                    NotificationKind::ReservationConfirmed,
                    "Reservation confirmed",
                    format!(
                        "Your reservation for \"{}\" is confirmed. Pick it up between {} and {}.",
                        item.name,
                        reservation.pickup_date.format("%Y-%m-%d %H:%M UTC"),
                        reservation.expiry_date.format("%Y-%m-%d %H:%M UTC"),
                    ),
                )
                .item(item.id)
                .reservation(reservation.id),
            )
            .await?;

        Ok(reservation)
    }

    /// List reservations; students only see their own
    pub async fn list(
        &self,
        claims: &UserClaims,
        mut query: ReservationQuery,
    ) -> AppResult<Vec<Reservation>> {
        if !claims.is_staff() {
            query.user_id = Some(claims.user_id);
        }
        self.repository.reservations.list(&query).await
    }

    /// Cancel a reservation (owner or staff)
    pub async fn cancel(&self, claims: &UserClaims, id: i32) -> AppResult<Reservation> {
        let reservation = self.repository.reservations.get_by_id(id).await?;
        claims.require_self_or_staff(reservation.user_id)?;

        if reservation.status == ReservationStatus::Cancelled {
            return Err(AppError::BadRequest("Reservation already cancelled".to_string()));
        }
        if reservation.status.is_terminal() {
            return Err(AppError::BadRequest("Reservation is no longer active".to_string()));
        }

        let cancelled = self.repository.reservations.cancel(id).await?;

        self.repository
            .notifications
            .create(
                NewNotification::new(
                    reservation.user_id,
                    NotificationKind::ReservationCancelled,
                    "Reservation cancelled",
                    format!(
                        "Your reservation with pickup on {} was cancelled.",
                        reservation.pickup_date.format("%Y-%m-%d %H:%M UTC"),
                    ),
                )
                .item(reservation.item_id)
                .reservation(reservation.id),
            )
            .await?;

        Ok(cancelled)
    }

    /// Expire reservations whose pickup window lapsed without a checkout;
    /// run from the maintenance scan so they release their held capacity
    pub async fn expire_lapsed(&self, now: DateTime<Utc>) -> AppResult<u64> {
        self.repository.reservations.expire_lapsed(now).await
    }

    /// Hourly pickup-slot availability for an item on a given day
    pub async fn slots(&self, item_id: i32, date: Option<NaiveDate>) -> AppResult<SlotsResponse> {
        let item = self.repository.items.get_by_id(item_id).await?;

        let day = date.unwrap_or_else(|| Utc::now().date_naive());
        let day_start = day
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always valid")
            .and_utc();
        let hold = Duration::hours(self.lending.reservation_hold_hours);

        // Every reservation able to overlap any slot window of the day
        let windows = self
            .repository
            .reservations
            .windows_overlapping(item_id, day_start, day_start + Duration::hours(24) + hold)
            .await?;

        let slots = (0..24)
            .map(|hour| {
                let slot_start = day_start + Duration::hours(hour);
                SlotAvailability {
                    pickup_date: slot_start,
                    remaining: slot_remaining(&windows, slot_start, slot_start + hold, item.quantity),
                }
            })
            .collect();

        Ok(SlotsResponse {
            item_id,
            date: day,
            quantity: item.quantity,
            slots,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, hour, 0, 0).unwrap()
    }

    fn window(start_hour: u32, end_hour: u32) -> ReservationWindow {
        ReservationWindow {
            pickup_date: at(start_hour),
            expiry_date: at(end_hour),
        }
    }

    #[test]
    fn overlap_is_half_open() {
        // [9, 12) vs [12, 15): touching endpoints do not overlap
        assert!(!windows_overlap(at(9), at(12), at(12), at(15)));
        // [9, 13) vs [12, 15)
        assert!(windows_overlap(at(9), at(13), at(12), at(15)));
        // containment
        assert!(windows_overlap(at(9), at(20), at(12), at(15)));
        // disjoint
        assert!(!windows_overlap(at(1), at(2), at(12), at(15)));
    }

    #[test]
    fn slot_remaining_counts_overlapping_windows() {
        let windows = vec![window(8, 10), window(9, 11), window(20, 22)];

        // Slot [9, 10): the first two windows overlap it
        assert_eq!(slot_remaining(&windows, at(9), at(10), 3), 1);
        // Slot [12, 14): none overlap
        assert_eq!(slot_remaining(&windows, at(12), at(14), 3), 3);
        // Slot [21, 23): the evening window only
        assert_eq!(slot_remaining(&windows, at(21), at(23), 3), 2);
    }

    #[test]
    fn slot_remaining_floors_at_zero() {
        let windows = vec![window(8, 12), window(8, 12), window(8, 12)];
        assert_eq!(slot_remaining(&windows, at(9), at(10), 2), 0);
    }
}
