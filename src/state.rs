//! Shared application state injected into every handler.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::ShortUrlService;
use crate::domain::repositories::ShortUrlRepository;

/// Short URL service over any repository implementation.
pub type DynShortUrlService = ShortUrlService<dyn ShortUrlRepository>;

#[derive(Clone)]
pub struct AppState {
    pub short_url_service: Arc<DynShortUrlService>,
    /// Deadline applied to every service call made by a handler.
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(repository: Arc<dyn ShortUrlRepository>, request_timeout: Duration) -> Self {
        Self {
            short_url_service: Arc::new(ShortUrlService::new(repository)),
            request_timeout,
        }
    }
}
