//! Library consortium statistics server
//!
//! Libraries report the E-Books, E-Journals and audio-visual titles they subscribe
//! to each year. Shared (global) catalog items are never modified by a library's
//! edit: the library gets its own private copy instead.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
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
