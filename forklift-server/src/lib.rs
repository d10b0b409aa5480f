//! Forklift repair logging server
//!
//! Server-rendered pages for the forklift fleet, preventive-maintenance and
//! workshop jobs, and user management, backed by SQLite.

pub mod config;
pub mod db;
pub mod middleware;
pub mod repository;
pub mod service;
pub mod session;
pub mod state;
pub mod templates;
pub mod web;

use std::time::Duration;

use tokio::task::JoinHandle;

use crate::state::AppState;

/// How often expired sessions and reset tokens are swept
pub const PURGE_INTERVAL: Duration = Duration::from_secs(300);

/// Periodically drop expired sessions and reset tokens
pub fn spawn_purge_task(state: AppState, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            interval.tick().await;

            let sessions = state.sessions().purge_expired();
            let tokens = state.reset_tokens().purge_expired();
            if sessions + tokens > 0 {
                tracing::debug!(
                    "Purged {} expired session(s) and {} reset token(s)",
                    sessions,
                    tokens
                );
            }
        }
    })
}
