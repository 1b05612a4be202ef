use std::sync::Arc;

use axum::extract::ws::Message;

use crate::relay::Relay;

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay<Message>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            relay: Arc::new(Relay::new()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
