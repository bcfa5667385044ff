//! Shared handler state.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::bootstrap::config::Config;
use crate::modules::media::ThumbnailStore;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub media: Arc<dyn ThumbnailStore>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config, media: Arc<dyn ThumbnailStore>) -> Self {
        AppState {
            db,
            config: Arc::new(config),
            media,
        }
    }
}
