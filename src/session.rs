//! Injected session context.
//!
//! Holds the bearer token and an `on_expired` hook instead of a global
//! redirect, so the API client stays testable without a navigation
//! environment. A 401 from any endpoint expires the session exactly once;
//! later calls see the token gone and fail locally.

use std::sync::Mutex;

type ExpiredHook = Box<dyn Fn() + Send + Sync>;

/// Session state shared by every API call.
pub struct Session {
    token: Mutex<Option<String>>,
    on_expired: Option<ExpiredHook>,
}

impl Session {
    /// Create a session with an initial token and no expiry hook.
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            token: Mutex::new(if token.is_empty() { None } else { Some(token) }),
            on_expired: None,
        }
    }

    /// Create a session that fires `hook` when the server rejects the token.
    pub fn with_expired_hook(token: impl Into<String>, hook: impl Fn() + Send + Sync + 'static) -> Self {
        let mut session = Self::new(token);
        session.on_expired = Some(Box::new(hook));
        session
    }

    /// Current bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.token.lock().expect("session lock poisoned").clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Replace the token after a fresh login.
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.lock().expect("session lock poisoned") = Some(token.into());
    }

    /// Clear the token and fire the expiry hook. Idempotent: the hook fires
    /// only on the transition from authenticated to expired.
    pub fn expire(&self) {
        let had_token = self
            .token
            .lock()
            .expect("session lock poisoned")
            .take()
            .is_some();
        if had_token {
            if let Some(hook) = &self.on_expired {
                hook();
            }
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
