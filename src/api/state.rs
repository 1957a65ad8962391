use std::sync::Arc;

use crate::application::BotEngine;
use crate::domain::ports::SessionStore;
use crate::infrastructure::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<BotEngine>,
    pub sessions: Arc<dyn SessionStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        engine: Arc<BotEngine>,
        sessions: Arc<dyn SessionStore>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            engine,
            sessions,
            config,
        }
    }
}
