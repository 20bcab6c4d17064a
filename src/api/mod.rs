pub mod auth;
pub mod handlers;
pub mod routes;

pub use auth::{AuthenticatedUser, Authenticator};
pub use routes::*;

use crate::processing::CatalogProcessor;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<CatalogProcessor>,
    pub authenticator: Arc<dyn Authenticator>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(processor: Arc<CatalogProcessor>, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            processor,
            authenticator,
            started_at: Instant::now(),
        }
    }
}
