//! Name-only login session carried in a signed cookie.
//!
//! The cookie holds an HS256 JWT whose subject is the display name. It is
//! identity for display purposes only; there are no passwords and no
//! per-user data.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
    response::Redirect,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

pub const SESSION_COOKIE: &str = "studydesk_session";
pub const FLASH_COOKIE: &str = "studydesk_flash";

/// Longest display name accepted at login.
pub const MAX_USERNAME_LEN: usize = 64;

/// Claims stored in the session cookie.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionToken {
    /// Display name entered at login.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

impl SessionToken {
    /// Build a token for `username`, or `None` if the name is blank or too
    /// long. Surrounding whitespace is trimmed.
    pub fn new(username: &str, ttl: Duration) -> Option<Self> {
        let username = username.trim();
        if username.is_empty() || username.chars().count() > MAX_USERNAME_LEN {
            return None;
        }

        let now = Utc::now();
        Some(Self {
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        })
    }

    pub fn username(&self) -> &str {
        &self.sub
    }
}

/// Signing keys and lifetime for session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SessionKeys {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.session_secret.as_bytes(), config.session_ttl)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, token: &SessionToken) -> Result<String, jsonwebtoken::errors::Error> {
        encode(&Header::default(), token, &self.encoding)
    }

    /// Verify signature and expiry. Any failure means "not logged in".
    pub fn verify(&self, raw: &str) -> Option<SessionToken> {
        match decode::<SessionToken>(raw, &self.decoding, &Validation::default()) {
            Ok(data) if !data.claims.sub.trim().is_empty() => Some(data.claims),
            Ok(_) => {
                tracing::warn!("Session token with empty subject");
                None
            }
            Err(e) => {
                tracing::debug!("Rejected session token: {}", e);
                None
            }
        }
    }

    pub fn session_cookie(&self, raw_token: &str) -> String {
        format!(
            "{SESSION_COOKIE}={raw_token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.ttl.num_seconds()
        )
    }
}

pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// One-shot messages shown on the next page view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    LoggedIn,
}

impl Flash {
    fn code(&self) -> &'static str {
        match self {
            Self::LoggedIn => "login",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "login" => Some(Self::LoggedIn),
            _ => None,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::LoggedIn => "Successfully login",
        }
    }

    pub fn set_cookie(&self) -> String {
        format!("{FLASH_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", self.code())
    }

    pub fn clear_cookie() -> String {
        format!("{FLASH_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
    }

    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        cookie_value(headers, FLASH_COOKIE).and_then(Self::from_code)
    }
}

/// Find a cookie by name in the request's `Cookie` headers.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
        .filter(|v| !v.is_empty())
}

/// The logged-in user. Extracting it from a request without a valid session
/// redirects to the login page.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub SessionToken);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = SessionKeys::from_ref(state);

        cookie_value(&parts.headers, SESSION_COOKIE)
            .and_then(|raw| keys.verify(raw))
            .map(CurrentUser)
            .ok_or_else(|| Redirect::to("/login"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn keys(secret: &str) -> SessionKeys {
        SessionKeys::new(secret.as_bytes(), Duration::hours(1))
    }

    #[test]
    fn blank_or_oversized_names_get_no_token() {
        assert!(SessionToken::new("", Duration::hours(1)).is_none());
        assert!(SessionToken::new("   ", Duration::hours(1)).is_none());
        assert!(SessionToken::new(&"x".repeat(MAX_USERNAME_LEN + 1), Duration::hours(1)).is_none());
    }

    #[test]
    fn names_are_trimmed() {
        let token = SessionToken::new("  Ada  ", Duration::hours(1)).unwrap();
        assert_eq!(token.username(), "Ada");
        assert!(token.exp > token.iat);
    }

    #[test]
    fn issued_token_verifies_with_same_secret() {
        let keys = keys("secret-a");
        let token = SessionToken::new("Ada", keys.ttl()).unwrap();
        let raw = keys.issue(&token).unwrap();

        assert_eq!(keys.verify(&raw), Some(token));
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let token = SessionToken::new("Ada", Duration::hours(1)).unwrap();
        let raw = keys("secret-a").issue(&token).unwrap();

        assert!(keys("secret-b").verify(&raw).is_none());
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = keys("secret-a");
        let now = Utc::now().timestamp();
        let token = SessionToken {
            sub: "Ada".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let raw = keys.issue(&token).unwrap();

        assert!(keys.verify(&raw).is_none());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(keys("secret-a").verify("Ada").is_none());
    }

    #[test]
    fn cookie_value_finds_named_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; studydesk_flash=login; other=1"),
        );

        assert_eq!(cookie_value(&headers, FLASH_COOKIE), Some("login"));
        assert_eq!(cookie_value(&headers, "theme"), Some("dark"));
        assert_eq!(cookie_value(&headers, SESSION_COOKIE), None);
        assert_eq!(Flash::from_headers(&headers), Some(Flash::LoggedIn));
    }

    #[test]
    fn cleared_cookie_reads_as_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("studydesk_session="));
        assert_eq!(cookie_value(&headers, SESSION_COOKIE), None);
    }
}
