/// Shared application state
use crate::services::AuthService;
use newcomer_core::UserStore;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub auth_service: Arc<AuthService>,
    /// Mark the session cookie `Secure` (production only)
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>, auth_service: Arc<AuthService>) -> Self {
        Self {
            store,
            auth_service,
            secure_cookies: false,
        }
    }

    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }
}
