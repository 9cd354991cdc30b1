//! C.A.M.P. - Campus Asset Management Platform
//!
//! A Rust REST API server for campus equipment lending: students and
//! facility staff browse, reserve, borrow, return and pay fines on shared
//! equipment.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod jobs;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
