/**
 * Session Authentication
 * Server-side sessions and the gate protecting admin operations
 */
use axum::http::{header, HeaderMap};
use chrono::Utc;
use rand::distr::{Alphanumeric, SampleString};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Name of the session cookie. The session is the sole token of
/// authentication; there is no API key or bearer token.
pub const SESSION_COOKIE: &str = "agency_session";

/// Session lifetime in hours.
const SESSION_TTL_HOURS: i64 = 24;

/// What a live session carries: the authenticated user.
#[derive(Debug, Clone)]
pub struct SessionData {
    pub user_id: Uuid,
    pub username: String,
    pub expires_at: i64,
}

/// In-memory session store. Sessions are keyed by the SHA-256 hash of the
/// cookie token so the raw credential never sits in the map.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionData>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Establish a session for a user; returns the raw token handed to the
    /// client. Expired entries are evicted on every write so the map stays
    /// proportional to the number of live sessions.
    pub async fn create(&self, user_id: Uuid, username: &str) -> String {
        let token = generate_session_token();
        let now = Utc::now().timestamp();

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(
            hash_session_token(&token),
            SessionData {
                user_id,
                username: username.to_string(),
                expires_at: now + SESSION_TTL_HOURS * 3600,
            },
        );
        token
    }

    /// Resolve a token to its session, if still valid.
    pub async fn resolve(&self, token: &str) -> Option<SessionData> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&hash_session_token(token))
            .filter(|s| s.expires_at > Utc::now().timestamp())
            .cloned()
    }

    /// Destroy a session unconditionally. Destroying an unknown or already
    /// destroyed token is a no-op.
    pub async fn destroy(&self, token: &str) {
        self.sessions
            .write()
            .await
            .remove(&hash_session_token(token));
    }
}

/// Generate a random session token.
fn generate_session_token() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), 64)
}

/// Hash a session token for storage using SHA-256.
fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Pull the session token out of the Cookie header.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == SESSION_COOKIE).then(|| value.to_string())
        })
}

/// Set-Cookie value establishing a session on the client.
pub fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        SESSION_TTL_HOURS * 3600
    )
}

/// Set-Cookie value removing the session cookie from the client.
pub fn clear_session_cookie() -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE
    )
}

/// The auth gate. Every admin handler calls this before touching the store;
/// a missing, unknown or expired session short-circuits with `Unauthorized`
/// and no side effects are performed.
pub async fn require_auth(state: &AppState, headers: &HeaderMap) -> Result<SessionData, ApiError> {
    let token = extract_session_token(headers).ok_or(ApiError::Unauthorized)?;
    state
        .sessions
        .resolve(&token)
        .await
        .ok_or(ApiError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[tokio::test]
    async fn test_session_round_trip() {
        let sessions = SessionStore::new();
        let user_id = Uuid::new_v4();
        let token = sessions.create(user_id, "admin").await;

        let data = sessions.resolve(&token).await.expect("session resolves");
        assert_eq!(data.user_id, user_id);
        assert_eq!(data.username, "admin");
    }

    #[tokio::test]
    async fn test_same_session_yields_same_user_until_destroyed() {
        let sessions = SessionStore::new();
        let user_id = Uuid::new_v4();
        let token = sessions.create(user_id, "admin").await;

        assert_eq!(sessions.resolve(&token).await.unwrap().user_id, user_id);
        assert_eq!(sessions.resolve(&token).await.unwrap().user_id, user_id);

        sessions.destroy(&token).await;
        assert!(sessions.resolve(&token).await.is_none());

        // Destroying again is a no-op.
        sessions.destroy(&token).await;
    }

    #[tokio::test]
    async fn test_unknown_token_does_not_resolve() {
        let sessions = SessionStore::new();
        assert!(sessions.resolve("not-a-real-token").await.is_none());
    }

    #[test]
    fn test_extract_session_token_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; agency_session=tok123; lang=en"),
        );
        assert_eq!(extract_session_token(&headers).as_deref(), Some("tok123"));
    }

    #[test]
    fn test_extract_session_token_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark"));
        assert!(extract_session_token(&headers).is_none());
        assert!(extract_session_token(&HeaderMap::new()).is_none());
    }

    #[test]
    fn test_cookie_attributes() {
        let cookie = session_cookie("tok");
        assert!(cookie.starts_with("agency_session=tok;"));
        assert!(cookie.contains("HttpOnly"));

        let cleared = clear_session_cookie();
        assert!(cleared.contains("Max-Age=0"));
    }
}
