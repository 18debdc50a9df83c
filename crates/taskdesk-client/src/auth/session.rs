/*
[INPUT]:  Session tokens and optional expiration
[OUTPUT]: Token retrieval and expiration status
[POS]:    Auth layer - token lifecycle management
[UPDATE]: When adding token refresh or changing storage strategy
*/

use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::http::{ApiError, Result};

/// Opaque session credential sent as the `Authorization` header
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

/// Stored token data with metadata
#[derive(Debug, Clone)]
pub struct TokenData {
    pub token: SessionToken,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Thread-safe session token holder
#[derive(Debug, Clone, Default)]
pub struct SessionManager {
    data: Arc<RwLock<Option<TokenData>>>,
}

impl SessionManager {
    /// Create a new empty session manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager already holding a non-expiring token
    pub fn with_token(token: SessionToken) -> Self {
        let manager = Self::new();
        manager.set_token(token, None);
        manager
    }

    /// Store a token, optionally expiring after `expires_seconds`
    pub fn set_token(&self, token: SessionToken, expires_seconds: Option<u64>) {
        let expires_at = expires_seconds.map(|secs| Utc::now() + Duration::seconds(secs as i64));
        let mut guard = self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(TokenData { token, expires_at });
    }

    /// Get the current token if present and unexpired
    pub fn get_token(&self) -> Option<SessionToken> {
        self.token_data()
            .filter(|data| !is_past(data.expires_at))
            .map(|data| data.token)
    }

    /// Current token or an auth error suitable for propagation
    pub fn require_token(&self) -> Result<SessionToken> {
        self.get_token().ok_or(ApiError::TokenExpired)
    }

    /// Check if token is missing or expired
    pub fn is_expired(&self) -> bool {
        self.get_token().is_none()
    }

    /// Get token data if available
    pub fn token_data(&self) -> Option<TokenData> {
        let guard = self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.clone()
    }

    /// Clear the stored token
    pub fn clear(&self) {
        let mut guard = self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = None;
    }
}

fn is_past(expires_at: Option<DateTime<Utc>>) -> bool {
    expires_at.is_some_and(|at| Utc::now() > at)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_manager_is_empty() {
        let manager = SessionManager::new();
        assert!(manager.get_token().is_none());
        assert!(manager.is_expired());
        assert!(matches!(manager.require_token(), Err(ApiError::TokenExpired)));
    }

    #[test]
    fn test_set_and_get_token() {
        let manager = SessionManager::new();
        manager.set_token(SessionToken::new("test_token"), Some(3600));

        assert_eq!(manager.get_token(), Some(SessionToken::new("test_token")));
        assert!(!manager.is_expired());
    }

    #[test]
    fn test_token_without_expiry_never_expires() {
        let manager = SessionManager::with_token(SessionToken::new("forever"));
        assert!(!manager.is_expired());
        assert!(manager.token_data().unwrap().expires_at.is_none());
    }

    #[test]
    fn test_clear_token() {
        let manager = SessionManager::with_token(SessionToken::new("test_token"));
        manager.clear();
        assert!(manager.get_token().is_none());
        assert!(manager.is_expired());
    }

    #[test]
    fn test_debug_redacts_token() {
        let token = SessionToken::new("secret-value");
        assert!(!format!("{token:?}").contains("secret"));
    }
}
