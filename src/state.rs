//! Shared application state for all routes.

use crate::config::{Settings, WriteMode};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// `None` in offline mode (no DATABASE_URL).
    pub pool: Option<PgPool>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(pool: Option<PgPool>, settings: Settings) -> Self {
        AppState {
            pool,
            settings: Arc::new(settings),
        }
    }

    /// State with no database: every read and write answers with the empty dataset.
    pub fn offline() -> Self {
        Self::new(None, Settings::default())
    }

    pub fn write_mode(&self) -> WriteMode {
        self.settings.write_mode
    }
}
