//! C.A.M.P. Server - Campus Asset Management Platform
//!
//! A Rust REST API server for campus equipment lending.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use camp_server::{api, config::AppConfig, jobs::Scheduler, repository::Repository, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("camp_server={},tower_http=debug", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting C.A.M.P. Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Arc::new(Services::new(
        repository,
        config.auth.clone(),
        config.lending.clone(),
    ));

    // Background maintenance: overdue fines and waitlist promotion
    Scheduler::new(services.clone(), config.scheduler.clone()).spawn();

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services,
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // IP-based rate limiting
    let governor_conf = Box::new(
        GovernorConfigBuilder::default()
            .per_second(state.config.rate_limit.per_second)
            .burst_size(state.config.rate_limit.burst)
            .finish()
            .expect("Invalid rate limit configuration"),
    );

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/register", post(api::auth::register))
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        // Users
        .route("/users", get(api::users::list_users))
        .route("/users", post(api::users::create_user))
        .route("/users/:id", get(api::users::get_user))
        .route("/users/:id/campus-cash", post(api::users::top_up_campus_cash))
        // Facilities
        .route("/facilities", get(api::facilities::list_facilities))
        .route("/facilities", post(api::facilities::create_facility))
        .route("/facilities/:id", put(api::facilities::update_facility))
        // Items (equipment catalog)
        .route("/items", get(api::items::list_items))
        .route("/items", post(api::items::create_item))
        .route("/items/:id", get(api::items::get_item))
        .route("/items/:id", put(api::items::update_item))
        .route("/items/:id", delete(api::items::delete_item))
        // Reservations
        .route("/reservations", get(api::reservations::list_reservations))
        .route("/reservations", post(api::reservations::create_reservation))
        .route("/reservations/slots", get(api::reservations::reservation_slots))
        .route("/reservations/:id/cancel", put(api::reservations::cancel_reservation))
        // Borrowals
        .route("/borrowals", get(api::borrowals::list_borrowals))
        .route("/borrowals/checkout", post(api::borrowals::checkout))
        .route("/borrowals/:id", get(api::borrowals::get_borrowal))
        .route("/borrowals/:id/return", put(api::borrowals::return_borrowal))
        .route("/borrowals/:id/renew", put(api::borrowals::renew_borrowal))
        // Fines
        .route("/fines", get(api::fines::list_fines))
        .route("/fines", post(api::fines::create_fine))
        .route("/fines/:id/pay", post(api::fines::pay_fine))
        .route("/fines/:id/waive", put(api::fines::waive_fine))
        // Waitlist
        .route("/waitlist", get(api::waitlist::list_waitlist))
        .route("/waitlist", post(api::waitlist::join_waitlist))
        .route("/waitlist/:id", delete(api::waitlist::leave_waitlist))
        // Notifications
        .route("/notifications", get(api::notifications::list_notifications))
        .route("/notifications/read-all", put(api::notifications::mark_all_notifications_read))
        .route("/notifications/:id/read", put(api::notifications::mark_notification_read))
        // Dashboard
        .route("/dashboard", get(api::dashboard::get_dashboard))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(GovernorLayer {
            config: Box::leak(governor_conf),
        })
}
