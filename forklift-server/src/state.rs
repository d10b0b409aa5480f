//! Application State
//!
//! Arc-wrapped state shared across handlers and middleware.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::session::{ResetTokenStore, SessionStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    pool: SqlitePool,
    config: Config,
    sessions: SessionStore,
    reset_tokens: ResetTokenStore,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        Self {
            inner: Arc::new(InnerState {
                pool,
                sessions: SessionStore::new(config.session_ttl),
                reset_tokens: ResetTokenStore::new(config.reset_token_ttl),
                config,
            }),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    pub fn reset_tokens(&self) -> &ResetTokenStore {
        &self.inner.reset_tokens
    }
}
