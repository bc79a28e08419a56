use std::sync::Arc;

use tinylink_core::{Redirector, Shortener};

#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<dyn Shortener>,
    pub redirector: Arc<dyn Redirector>,
}

impl AppState {
    pub fn new(shortener: Arc<dyn Shortener>, redirector: Arc<dyn Redirector>) -> Self {
        Self {
            shortener,
            redirector,
        }
    }
}
