//! Shared application state for the web server.

use std::sync::Arc;

use picomol_common::config::ServiceConfig;

/// Shared state injected into every Axum handler.
#[derive(Clone)]
pub struct AppState {
    pub config: ServiceConfig,
}

impl AppState {
    pub fn new(config: ServiceConfig) -> Self {
        Self { config }
    }
}

pub type SharedState = Arc<AppState>;
