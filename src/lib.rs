//! Shelfmark Book Catalog Server
//!
//! A REST JSON API for managing a catalog of authors and books, with
//! filtering, searching, ordering and a read-only-for-anonymous permission
//! policy.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod filters;
pub mod models;
pub mod permissions;
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
