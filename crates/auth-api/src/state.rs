use std::sync::Arc;

use auth_core::SessionAuthenticator;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<SessionAuthenticator>,
}

impl AppState {
    pub fn new(auth: SessionAuthenticator) -> Self {
        Self { auth: Arc::new(auth) }
    }
}
