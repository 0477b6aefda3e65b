//! Assetrack IT Asset Management System
//!
//! REST JSON API for tracking hardware through its lifecycle: a registry of
//! assets and three ledgers (assignments, maintenance, disposals) whose
//! writes keep each asset's status in step.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
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

impl AppState {
    /// Build services on top of `repository` using the given configuration
    pub fn new(config: AppConfig, repository: repository::Repository) -> Self {
        let services = services::Services::new(repository, config.auth.clone(), config.sync);
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }
}
