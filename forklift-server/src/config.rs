//! Server configuration
//!
//! All settings come from environment variables with defaults that match the
//! container deployment: all interfaces on port 8080, four workers.

use std::net::SocketAddr;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP listener binds to
    pub bind_addr: SocketAddr,

    /// SQLite connection URL
    pub database_url: String,

    /// Upper bound on pooled database connections
    pub db_max_connections: u32,

    /// Directory served under `/static`
    pub static_dir: String,

    /// Runtime worker threads serving requests
    pub workers: usize,

    /// Lifetime of a login session
    pub session_ttl: Duration,

    /// Lifetime of a password reset link
    pub reset_token_ttl: Duration,

    /// Mark the session cookie `Secure` (behind TLS)
    pub secure_cookies: bool,
}

impl Config {
    /// Creates configuration from environment variables
    ///
    /// Expected environment variables (all optional):
    /// - BIND_ADDR (default: 0.0.0.0:8080)
    /// - DATABASE_URL (default: sqlite://forklift.db)
    /// - DB_MAX_CONNECTIONS (default: 5)
    /// - STATIC_DIR (default: static)
    /// - WORKERS (default: 4)
    /// - SESSION_TTL_SECS (default: 86400)
    /// - RESET_TOKEN_TTL_SECS (default: 3600)
    /// - SECURE_COOKIES (default: false)
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let bind_addr = match std::env::var("BIND_ADDR") {
            Ok(raw) => raw
                .parse::<SocketAddr>()
                .map_err(|e| anyhow::anyhow!("BIND_ADDR '{}' is not a socket address: {}", raw, e))?,
            Err(_) => defaults.bind_addr,
        };

        let database_url = std::env::var("DATABASE_URL").unwrap_or(defaults.database_url);

        let db_max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(defaults.db_max_connections);

        let static_dir = std::env::var("STATIC_DIR").unwrap_or(defaults.static_dir);

        let workers = std::env::var("WORKERS")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(defaults.workers);

        let session_ttl = std::env::var("SESSION_TTL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.session_ttl);

        let reset_token_ttl = std::env::var("RESET_TOKEN_TTL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.reset_token_ttl);

        let secure_cookies = std::env::var("SECURE_COOKIES")
            .map(|s| matches!(s.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.secure_cookies);

        Ok(Self {
            bind_addr,
            database_url,
            db_max_connections,
            static_dir,
            workers,
            session_ttl,
            reset_token_ttl,
            secure_cookies,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.database_url.starts_with("sqlite:") {
            anyhow::bail!("database_url must be a sqlite: URL");
        }

        if self.db_max_connections == 0 {
            anyhow::bail!("db_max_connections must be greater than 0");
        }

        if self.workers == 0 {
            anyhow::bail!("workers must be greater than 0");
        }

        if self.session_ttl.as_secs() == 0 {
            anyhow::bail!("session_ttl must be greater than 0");
        }

        if self.reset_token_ttl.as_secs() == 0 {
            anyhow::bail!("reset_token_ttl must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            database_url: "sqlite://forklift.db".to_string(),
            db_max_connections: 5,
            static_dir: "static".to_string(),
            workers: 4,
            session_ttl: Duration::from_secs(24 * 60 * 60),
            reset_token_ttl: Duration::from_secs(60 * 60),
            secure_cookies: false,
        }
    }
}
