//! In-process session and password-reset token stores
//!
//! Both stores live in [`AppState`](crate::state::AppState) and are shared by
//! every request worker. Entries expire lazily on lookup; `purge_expired`
//! sweeps the rest.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use forklift_core::authz::CurrentUser;
use rand::RngCore;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "session_token";

/// A logged-in session with the user's details cached
#[derive(Debug, Clone)]
pub struct Session {
    pub user: CurrentUser,
    pub expires_at: DateTime<Utc>,
}

/// Session tokens mapped to sessions
#[derive(Debug)]
pub struct SessionStore {
    ttl: chrono::Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl: to_chrono(ttl),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Lifetime of a new session, used for the cookie `Max-Age`
    pub fn ttl(&self) -> chrono::Duration {
        self.ttl
    }

    /// Start a session for `user` and return its token
    pub fn create(&self, user: CurrentUser) -> String {
        self.create_at(user, Utc::now())
    }

    /// Look up a live session. An expired session is removed.
    pub fn get(&self, token: &str) -> Option<CurrentUser> {
        self.get_at(token, Utc::now())
    }

    /// End a session; unknown tokens are ignored
    pub fn remove(&self, token: &str) {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token);
    }

    /// End every session belonging to `user_id`
    pub fn remove_user(&self, user_id: i64) {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|_, s| s.user.id != user_id);
    }

    /// Drop expired sessions, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        purge(&self.sessions, Utc::now(), |s| s.expires_at)
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn create_at(&self, user: CurrentUser, now: DateTime<Utc>) -> String {
        let token = random_token(16);
        let session = Session {
            user,
            expires_at: now + self.ttl,
        };

        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.clone(), session);

        token
    }

    fn get_at(&self, token: &str, now: DateTime<Utc>) -> Option<CurrentUser> {
        {
            let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
            match sessions.get(token) {
                None => return None,
                Some(session) if session.expires_at >= now => return Some(session.user.clone()),
                Some(_) => {}
            }
        }

        tracing::debug!("Session expired");
        self.remove(token);
        None
    }
}

/// A pending password reset
#[derive(Debug, Clone)]
struct ResetToken {
    user_id: i64,
    expires_at: DateTime<Utc>,
}

/// Single-use password reset tokens
#[derive(Debug)]
pub struct ResetTokenStore {
    ttl: chrono::Duration,
    tokens: RwLock<HashMap<String, ResetToken>>,
}

impl ResetTokenStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl: to_chrono(ttl),
            tokens: RwLock::new(HashMap::new()),
        }
    }

    /// Issue a reset token for `user_id`
    pub fn issue(&self, user_id: i64) -> String {
        self.issue_at(user_id, Utc::now())
    }

    /// User id behind a live token, without consuming it
    pub fn peek(&self, token: &str) -> Option<i64> {
        self.peek_at(token, Utc::now())
    }

    /// Consume a live token, returning its user id
    pub fn consume(&self, token: &str) -> Option<i64> {
        let user_id = self.peek(token)?;
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token);
        Some(user_id)
    }

    pub fn purge_expired(&self) -> usize {
        purge(&self.tokens, Utc::now(), |t| t.expires_at)
    }

    fn issue_at(&self, user_id: i64, now: DateTime<Utc>) -> String {
        let token = random_token(32);
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                token.clone(),
                ResetToken {
                    user_id,
                    expires_at: now + self.ttl,
                },
            );
        token
    }

    fn peek_at(&self, token: &str, now: DateTime<Utc>) -> Option<i64> {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .filter(|t| t.expires_at >= now)
            .map(|t| t.user_id)
    }
}

fn purge<V>(
    map: &RwLock<HashMap<String, V>>,
    now: DateTime<Utc>,
    expires_at: impl Fn(&V) -> DateTime<Utc>,
) -> usize {
    let mut map = map.write().unwrap_or_else(PoisonError::into_inner);
    let before = map.len();
    map.retain(|_, v| expires_at(v) >= now);
    before - map.len()
}

fn random_token(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

fn to_chrono(ttl: Duration) -> chrono::Duration {
    chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(36_500))
}
