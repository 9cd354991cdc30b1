//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{
    auth, borrowals, dashboard, facilities, fines, health, items, notifications, reservations,
    users, waitlist,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "C.A.M.P. API",
        version = "1.0.0",
        description = "Campus Asset Management Platform REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "C.A.M.P. Team")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::top_up_campus_cash,
        // Facilities
        facilities::list_facilities,
        facilities::create_facility,
        facilities::update_facility,
        // Items
        items::list_items,
        items::get_item,
        items::create_item,
        items::update_item,
        items::delete_item,
        // Reservations
        reservations::create_reservation,
        reservations::list_reservations,
        reservations::cancel_reservation,
        reservations::reservation_slots,
        // Borrowals
        borrowals::checkout,
        borrowals::return_borrowal,
        borrowals::renew_borrowal,
        borrowals::list_borrowals,
        borrowals::get_borrowal,
        // Fines
        fines::list_fines,
        fines::create_fine,
        fines::pay_fine,
        fines::waive_fine,
        // Waitlist
        waitlist::join_waitlist,
        waitlist::leave_waitlist,
        waitlist::list_waitlist,
        // Notifications
        notifications::list_notifications,
        notifications::mark_notification_read,
        notifications::mark_all_notifications_read,
        // Dashboard
        dashboard::get_dashboard,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            // Users
            crate::models::user::User,
            crate::models::user::RegisterRequest,
            crate::models::user::CreateUser,
            crate::models::user::TopUpRequest,
            crate::models::enums::UserRole,
            // Facilities
            crate::models::facility::Facility,
            crate::models::facility::CreateFacility,
            crate::models::facility::UpdateFacility,
            // Items
            crate::models::item::Item,
            crate::models::item::CreateItem,
            crate::models::item::UpdateItem,
            crate::models::enums::ItemCategory,
            crate::models::enums::ItemStatus,
            // Reservations
            crate::models::reservation::Reservation,
            crate::models::reservation::CreateReservation,
            crate::models::reservation::SlotAvailability,
            crate::models::reservation::SlotsResponse,
            crate::models::enums::ReservationStatus,
            // Borrowals
            crate::models::borrowal::Borrowal,
            crate::models::borrowal::CheckoutRequest,
            crate::models::borrowal::ReturnRequest,
            crate::models::enums::BorrowalStatus,
            // Fines
            crate::models::fine::Fine,
            crate::models::fine::CreateFine,
            crate::models::fine::PayFineRequest,
            crate::models::enums::FineReason,
            crate::models::enums::FineStatus,
            // Waitlist
            crate::models::waitlist::WaitlistEntry,
            crate::models::waitlist::JoinWaitlistRequest,
            crate::models::enums::WaitlistStatus,
            // Notifications
            crate::models::notification::Notification,
            crate::models::enums::NotificationKind,
            crate::models::enums::NotificationPriority,
            notifications::ReadAllResponse,
            // Dashboard
            dashboard::DashboardResponse,
            dashboard::BorrowalCounts,
            dashboard::FineCounts,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User management"),
        (name = "facilities", description = "Facility management"),
        (name = "items", description = "Equipment catalog"),
        (name = "reservations", description = "Reservations and pickup slots"),
        (name = "borrowals", description = "Checkout, return and renewal"),
        (name = "fines", description = "Fines and payments"),
        (name = "waitlist", description = "Waitlist queues"),
        (name = "notifications", description = "In-app notifications"),
        (name = "dashboard", description = "Staff dashboard")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
