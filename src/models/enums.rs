//! Shared domain enums.
//!
//! All lifecycle enums are persisted as their kebab-case text codes, so the
//! database stays readable and the API payloads match the stored values.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Declare an enum persisted as a TEXT column.
///
/// Generates serde renames, `as_str`/`Display`/`FromStr`, and the sqlx
/// `Type`/`Decode`/`Encode` impls for Postgres.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $code:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
        pub enum $name {
            $(#[serde(rename = $code)] $variant,)+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($code => Ok(Self::$variant),)+
                    other => Err(format!("Invalid {} value: {}", stringify!($name), other)),
                }
            }
        }

        impl sqlx::Type<sqlx::Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<sqlx::Postgres>>::type_info()
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $name {
            fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
                let s: String = sqlx::Decode::<sqlx::Postgres>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl sqlx::Encode<'_, sqlx::Postgres> for $name {
            fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
                <String as sqlx::Encode<sqlx::Postgres>>::encode(self.as_str().to_string(), buf)
            }
        }
    };
}

text_enum! {
    /// Account roles. Staff and admin operate the lending desk.
    UserRole {
        Student => "student",
        Staff => "staff",
        Admin => "admin",
    }
}

impl UserRole {
    /// Staff-level access (facility staff or administrator)
    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Staff | UserRole::Admin)
    }
}

text_enum! {
    /// Equipment categories, each with its own daily late-fee rate.
    ItemCategory {
        Camera => "camera",
        Computer => "computer",
        Audio => "audio",
        Lighting => "lighting",
        Accessory => "accessory",
        Other => "other",
    }
}

impl ItemCategory {
    /// Late-return fee accrued per day overdue, in campus dollars.
    pub fn daily_fine_rate(&self) -> Decimal {
        match self {
            ItemCategory::Camera => dec!(5.00),
            ItemCategory::Computer => dec!(10.00),
            ItemCategory::Audio => dec!(3.00),
            ItemCategory::Lighting => dec!(3.00),
            ItemCategory::Accessory => dec!(2.00),
            ItemCategory::Other => dec!(5.00),
        }
    }
}

text_enum! {
    /// Manual item lifecycle. Availability is computed from open borrowals
    /// and reservations, never stored, so there is no checked-out/reserved
    /// status here.
    ItemStatus {
        Available => "available",
        Maintenance => "maintenance",
        Retired => "retired",
    }
}

impl ItemStatus {
    /// Whether units of this item may be lent or reserved at all
    pub fn is_lendable(&self) -> bool {
        matches!(self, ItemStatus::Available)
    }
}

text_enum! {
    BorrowalStatus {
        Active => "active",
        Returned => "returned",
        Overdue => "overdue",
        Lost => "lost",
    }
}

text_enum! {
    ReservationStatus {
        Pending => "pending",
        Confirmed => "confirmed",
        PickedUp => "picked-up",
        Fulfilled => "fulfilled",
        Cancelled => "cancelled",
        Expired => "expired",
    }
}

impl ReservationStatus {
    /// Statuses that hold capacity against an item's quantity
    pub fn holds_capacity(&self) -> bool {
        matches!(self, ReservationStatus::Pending | ReservationStatus::Confirmed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Fulfilled | ReservationStatus::Cancelled | ReservationStatus::Expired
        )
    }
}

text_enum! {
    FineReason {
        LateReturn => "late-return",
        Damage => "damage",
        Loss => "loss",
        Other => "other",
    }
}

text_enum! {
    FineStatus {
        Pending => "pending",
        Paid => "paid",
        Waived => "waived",
        Appealed => "appealed",
    }
}

impl FineStatus {
    /// Whether a payment may be taken against the fine
    pub fn is_payable(&self) -> bool {
        matches!(self, FineStatus::Pending | FineStatus::Appealed)
    }
}

text_enum! {
    WaitlistStatus {
        Waiting => "waiting",
        Notified => "notified",
        Expired => "expired",
        Cancelled => "cancelled",
        Fulfilled => "fulfilled",
    }
}

impl WaitlistStatus {
    /// Entries that occupy a queue position
    pub fn is_queued(&self) -> bool {
        matches!(self, WaitlistStatus::Waiting | WaitlistStatus::Notified)
    }
}

text_enum! {
    NotificationKind {
        ReservationConfirmed => "reservation-confirmed",
        ReservationCancelled => "reservation-cancelled",
        ItemAvailable => "item-available",
        FineIssued => "fine-issued",
        FinePaid => "fine-paid",
        CheckoutReceipt => "checkout-receipt",
        ReturnReceipt => "return-receipt",
    }
}

text_enum! {
    NotificationPriority {
        Low => "low",
        Normal => "normal",
        High => "high",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn codes_round_trip() {
        for status in [
            ReservationStatus::Pending,
            ReservationStatus::Confirmed,
            ReservationStatus::PickedUp,
            ReservationStatus::Fulfilled,
            ReservationStatus::Cancelled,
            ReservationStatus::Expired,
        ] {
            assert_eq!(status.as_str().parse::<ReservationStatus>(), Ok(status));
        }
        assert_eq!("late-return".parse::<FineReason>(), Ok(FineReason::LateReturn));
        assert!("bogus".parse::<BorrowalStatus>().is_err());
    }

    #[test]
    fn fine_rates_match_fee_schedule() {
        assert_eq!(ItemCategory::Camera.daily_fine_rate(), dec!(5.00));
        assert_eq!(ItemCategory::Computer.daily_fine_rate(), dec!(10.00));
        assert_eq!(ItemCategory::Audio.daily_fine_rate(), dec!(3.00));
        assert_eq!(ItemCategory::Lighting.daily_fine_rate(), dec!(3.00));
        assert_eq!(ItemCategory::Accessory.daily_fine_rate(), dec!(2.00));
        assert_eq!(ItemCategory::Other.daily_fine_rate(), dec!(5.00));
    }

    #[test]
    fn capacity_holding_statuses() {
        assert!(ReservationStatus::Pending.holds_capacity());
        assert!(ReservationStatus::Confirmed.holds_capacity());
        assert!(!ReservationStatus::Fulfilled.holds_capacity());
        assert!(!ReservationStatus::Cancelled.holds_capacity());
        assert!(!ReservationStatus::PickedUp.holds_capacity());
    }

    #[test]
    fn staff_roles() {
        assert!(UserRole::Staff.is_staff());
        assert!(UserRole::Admin.is_staff());
        assert!(!UserRole::Student.is_staff());
    }
}
