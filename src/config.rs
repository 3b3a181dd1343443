//! Runtime configuration loaded from environment variables.

use std::path::PathBuf;

use chrono::Duration;

/// Default lifetime of a login, in hours.
pub const DEFAULT_SESSION_HOURS: i64 = 24;
/// Longest accepted login lifetime, in hours.
pub const MAX_SESSION_HOURS: i64 = 24 * 365;

// No Debug: holds the session secret.
#[derive(Clone)]
pub struct AppConfig {
    /// Database file (from STUDYDESK_DB). Falls back to the platform data dir.
    pub db_path: Option<PathBuf>,
    /// Secret used to sign session cookies (from STUDYDESK_SESSION_SECRET).
    pub session_secret: String,
    /// How long a login stays valid (from STUDYDESK_SESSION_HOURS).
    pub session_ttl: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Without STUDYDESK_SESSION_SECRET a random secret is generated, so
    /// logins do not survive a restart.
    pub fn from_env() -> Self {
        let db_path = std::env::var("STUDYDESK_DB").ok().map(PathBuf::from);

        let session_secret = match std::env::var("STUDYDESK_SESSION_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!(
                    "STUDYDESK_SESSION_SECRET not set, using a random per-process secret"
                );
                random_secret()
            }
        };

        let session_hours = std::env::var("STUDYDESK_SESSION_HOURS")
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .filter(|h| (1..=MAX_SESSION_HOURS).contains(h))
            .unwrap_or(DEFAULT_SESSION_HOURS);

        Self {
            db_path,
            session_secret,
            session_ttl: Duration::hours(session_hours),
        }
    }

    /// Create a config with a fixed secret (for testing).
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            db_path: None,
            session_secret: secret.into(),
            session_ttl: Duration::hours(DEFAULT_SESSION_HOURS),
        }
    }
}

fn random_secret() -> String {
    format!(
        "{}{}",
        uuid::Uuid::new_v4().simple(),
        uuid::Uuid::new_v4().simple()
    )
}
