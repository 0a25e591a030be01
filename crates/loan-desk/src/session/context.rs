use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::role::Role;

/// Credentials held after a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub role: Role,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("login response carried an empty token")]
    EmptyToken,
    #[error("not logged in")]
    NotLoggedIn,
}

/// Shared handle over the current session. Clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn init(
        &self,
        token: impl Into<String>,
        role: Role,
        username: impl Into<String>,
    ) -> Result<(), SessionError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(SessionError::EmptyToken);
        }
        *self.write() = Some(Session {
            token,
            role,
            username: username.into(),
        });
        Ok(())
    }

    pub fn teardown(&self) {
        *self.write() = None;
    }

    pub fn is_logged_in(&self) -> bool {
        self.read().is_some()
    }

    pub fn current(&self) -> Option<Session> {
        self.read().clone()
    }

    pub fn require(&self) -> Result<Session, SessionError> {
        self.current().ok_or(SessionError::NotLoggedIn)
    }

    pub fn role(&self) -> Option<Role> {
        self.read().as_ref().map(|session| session.role)
    }

    pub fn username(&self) -> Option<String> {
        self.read().as_ref().map(|session| session.username.clone())
    }

    pub fn token(&self) -> Option<String> {
        self.read().as_ref().map(|session| session.token.clone())
    }

    /// `Authorization` header value, when a token is held.
    pub fn bearer(&self) -> Option<String> {
        self.read()
            .as_ref()
            .map(|session| format!("Bearer {}", session.token))
    }

    // Session writes replace the whole value, so a poisoned lock still holds
    // a consistent session.
    fn read(&self) -> RwLockReadGuard<'_, Option<Session>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Session>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_logged_out() {
        let session = SessionContext::new();
        assert!(!session.is_logged_in());
        assert_eq!(session.bearer(), None);
        assert_eq!(session.require(), Err(SessionError::NotLoggedIn));
    }

    #[test]
    fn init_and_teardown_are_visible_through_clones() {
        let session = SessionContext::new();
        let shared = session.clone();

        session
            .init("tok-123", Role::Analyst, "riley")
            .expect("token present");

        assert!(shared.is_logged_in());
        assert_eq!(shared.role(), Some(Role::Analyst));
        assert_eq!(shared.username().as_deref(), Some("riley"));
        assert_eq!(shared.bearer().as_deref(), Some("Bearer tok-123"));

        shared.teardown();
        assert!(!session.is_logged_in());
        assert_eq!(session.token(), None);
    }

    #[test]
    fn empty_token_is_refused() {
        let session = SessionContext::new();
        assert_eq!(
            session.init("  ", Role::Customer, "sam"),
            Err(SessionError::EmptyToken)
        );
        assert!(!session.is_logged_in());
    }
}
