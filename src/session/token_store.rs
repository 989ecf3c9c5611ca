// src/session/token_store.rs
use super::{MemoryBackend, SessionBackend, SessionError};
use crate::types::auth::{jwt_expiry, parse_timestamp, AuthResponse, AuthSession, Role};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

pub const ACCESS_TOKEN_KEY: &str = "authToken";
pub const USER_ID_KEY: &str = "userId";
pub const USER_EMAIL_KEY: &str = "userEmail";
pub const USER_FULL_NAME_KEY: &str = "userFullName";
pub const USER_ROLE_KEY: &str = "userRole";
pub const EXPIRES_AT_KEY: &str = "tokenExpiresAt";

const ALL_KEYS: [&str; 6] = [
    ACCESS_TOKEN_KEY,
    USER_ID_KEY,
    USER_EMAIL_KEY,
    USER_FULL_NAME_KEY,
    USER_ROLE_KEY,
    EXPIRES_AT_KEY,
];

#[derive(Debug, Clone, PartialEq)]
pub struct StoredUser {
    pub user_id: String,
    pub email: String,
    pub full_name: String,
    pub role: Option<Role>,
    pub expires_at: Option<String>,
}

/// Single source of truth for the bearer token and the signed-in user
pub struct TokenStore {
    backend: Arc<dyn SessionBackend>,
}

impl TokenStore {
    pub fn new(backend: Arc<dyn SessionBackend>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// Persist a login/register response. Fails when it carries no token.
    pub fn save(&self, payload: &AuthResponse) -> Result<AuthSession, SessionError> {
        let token = payload
            .token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or(SessionError::InvalidAuthData)?;

        let role = payload.role.as_deref().and_then(|r| r.parse::<Role>().ok());

        // A half-written session must not look signed in
        if let Err(e) = self.write_session(token, payload, role.as_ref()) {
            warn!("Failed to persist session, clearing it: {}", e);
            self.clear();
            return Err(e);
        }

        info!(
            "Saved session for {}",
            payload.email.as_deref().unwrap_or("<unknown>")
        );

        Ok(AuthSession {
            token: token.to_string(),
            user_id: payload.user_id.clone().unwrap_or_default(),
            email: payload.email.clone().unwrap_or_default(),
            full_name: payload.full_name.clone().unwrap_or_default(),
            role,
            expires_at: payload.expires_at.clone(),
        })
    }

    /// Token goes last so readers never see it without its user fields
    fn write_session(
        &self,
        token: &str,
        payload: &AuthResponse,
        role: Option<&Role>,
    ) -> Result<(), SessionError> {
        self.put(USER_ID_KEY, payload.user_id.as_deref())?;
        self.put(USER_EMAIL_KEY, payload.email.as_deref())?;
        self.put(USER_FULL_NAME_KEY, payload.full_name.as_deref())?;
        self.put(USER_ROLE_KEY, role.map(Role::as_str))?;
        self.put(EXPIRES_AT_KEY, payload.expires_at.as_deref())?;
        self.backend.set(ACCESS_TOKEN_KEY, token)
    }

    fn put(&self, key: &str, value: Option<&str>) -> Result<(), SessionError> {
        match value {
            Some(v) => self.backend.set(key, v),
            None => self.backend.remove(key),
        }
    }

    pub fn get_token(&self) -> Option<String> {
        self.backend
            .get(ACCESS_TOKEN_KEY)
            .filter(|t| !t.is_empty())
    }

    pub fn get_user(&self) -> Option<StoredUser> {
        self.get_token()?;

        Some(StoredUser {
            user_id: self.backend.get(USER_ID_KEY).unwrap_or_default(),
            email: self.backend.get(USER_EMAIL_KEY).unwrap_or_default(),
            full_name: self.backend.get(USER_FULL_NAME_KEY).unwrap_or_default(),
            role: self
                .backend
                .get(USER_ROLE_KEY)
                .and_then(|r| r.parse().ok()),
            expires_at: self.backend.get(EXPIRES_AT_KEY),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.get_token().is_some()
    }

    /// Remove every session key. Never fails; storage errors are only logged.
    pub fn clear(&self) {
        for key in ALL_KEYS {
            if let Err(e) = self.backend.remove(key) {
                warn!("Error clearing auth data ({}): {}", key, e);
            }
        }
    }

    /// `Authorization` header value when a token is present
    pub fn auth_header(&self) -> Option<String> {
        self.get_token().map(|token| format!("Bearer {}", token))
    }

    /// Guard for operations that need a signed-in user
    pub fn require_session(&self) -> Result<StoredUser, SessionError> {
        self.get_user().ok_or(SessionError::NotAuthenticated)
    }

    /// Stored expiry, or the token's own `exp` claim when none was stored
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let token = self.get_token()?;
        self.backend
            .get(EXPIRES_AT_KEY)
            .as_deref()
            .and_then(parse_timestamp)
            .or_else(|| jwt_expiry(&token))
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|at| at <= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::path::PathBuf;

    /// Memory backend whose writes to one key always fail
    struct FailingBackend {
        inner: MemoryBackend,
        broken_key: &'static str,
    }

    impl SessionBackend for FailingBackend {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
            if key == self.broken_key {
                return Err(SessionError::Format {
                    path: PathBuf::from("session.toml"),
                    message: "disk full".into(),
                });
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), SessionError> {
            self.inner.remove(key)
        }
    }

    fn payload() -> AuthResponse {
        AuthResponse {
            token: Some("tok-123".into()),
            user_id: Some("7".into()),
            email: Some("jane@example.com".into()),
            full_name: Some("Jane Doe".into()),
            role: Some("Admin".into()),
            expires_at: Some("2030-06-01T12:00:00Z".into()),
        }
    }

    #[test]
    fn test_save_and_read_back() {
        let store = TokenStore::in_memory();
        let session = store.save(&payload()).unwrap();

        assert_eq!(session.token, "tok-123");
        assert_eq!(session.role, Some(Role::Admin));
        assert!(store.is_authenticated());
        assert_eq!(store.get_token().as_deref(), Some("tok-123"));
        assert_eq!(store.auth_header().as_deref(), Some("Bearer tok-123"));

        let user = store.get_user().unwrap();
        assert_eq!(user.user_id, "7");
        assert_eq!(user.email, "jane@example.com");
        assert_eq!(user.full_name, "Jane Doe");
        assert_eq!(user.role, Some(Role::Admin));
    }

    #[test]
    fn test_save_without_token_is_rejected() {
        let store = TokenStore::in_memory();

        let mut missing = payload();
        missing.token = None;
        assert!(matches!(
            store.save(&missing),
            Err(SessionError::InvalidAuthData)
        ));

        let mut blank = payload();
        blank.token = Some("  ".into());
        assert!(matches!(store.save(&blank), Err(SessionError::InvalidAuthData)));

        assert!(!store.is_authenticated());
        assert!(store.get_user().is_none());
    }

    #[test]
    fn test_clear_is_total_and_repeatable() {
        let store = TokenStore::in_memory();
        store.clear();

        store.save(&payload()).unwrap();
        store.clear();
        store.clear();

        assert!(store.get_token().is_none());
        assert!(store.get_user().is_none());
        assert!(store.auth_header().is_none());
        assert!(matches!(
            store.require_session(),
            Err(SessionError::NotAuthenticated)
        ));
    }

    #[test]
    fn test_expiry() {
        let store = TokenStore::in_memory();
        assert!(store.expires_at().is_none());

        store.save(&payload()).unwrap();
        let before = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2031, 1, 1, 0, 0, 0).unwrap();
        assert!(!store.is_expired(before));
        assert!(store.is_expired(after));
    }

    #[test]
    fn test_failed_write_leaves_no_session() {
        for broken_key in [USER_EMAIL_KEY, ACCESS_TOKEN_KEY] {
            let backend = Arc::new(FailingBackend {
                inner: MemoryBackend::new(),
                broken_key,
            });
            let store = TokenStore::new(backend.clone());

            assert!(store.save(&payload()).is_err());

            assert!(!store.is_authenticated());
            assert!(store.get_user().is_none());
            assert!(backend.get(USER_ID_KEY).is_none());
        }
    }

    #[test]
    fn test_failed_resave_signs_out() {
        let backend = Arc::new(FailingBackend {
            inner: MemoryBackend::new(),
            broken_key: EXPIRES_AT_KEY,
        });
        let store = TokenStore::new(backend.clone());
        backend.inner.set(ACCESS_TOKEN_KEY, "old-token").unwrap();
        assert!(store.is_authenticated());

        assert!(store.save(&payload()).is_err());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_resave_drops_stale_fields() {
        let store = TokenStore::in_memory();
        store.save(&payload()).unwrap();

        let mut second = payload();
        second.role = None;
        second.expires_at = None;
        store.save(&second).unwrap();

        let user = store.get_user().unwrap();
        assert!(user.role.is_none());
        assert!(user.expires_at.is_none());
    }
}
