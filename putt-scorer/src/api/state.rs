use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;

/// Shared handler state: the pool built at startup plus immutable configuration
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }
}
