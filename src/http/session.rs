//! In-memory session state
//!
//! Holds the access token and the signed-in user for the lifetime of the
//! process. Nothing here is ever written to disk; after a restart the
//! session is recovered through the refresh endpoint.

use kanban_api::User;
use std::sync::{PoisonError, RwLock};

#[derive(Debug, Default)]
struct SessionState {
    access_token: Option<String>,
    user: Option<User>,
}

/// Process-scoped credential holder shared by the API client and services
#[derive(Debug, Default)]
pub struct Session {
    state: RwLock<SessionState>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current access token, if signed in
    pub fn access_token(&self) -> Option<String> {
        self.read(|s| s.access_token.clone())
    }

    pub fn set_access_token(&self, token: impl Into<String>) {
        self.write(|s| s.access_token = Some(token.into()));
    }

    /// Signed-in user, if known
    pub fn user(&self) -> Option<User> {
        self.read(|s| s.user.clone())
    }

    pub fn set_user(&self, user: User) {
        self.write(|s| s.user = Some(user));
    }

    /// Store both halves of a successful login
    pub fn establish(&self, token: impl Into<String>, user: User) {
        let token = token.into();
        self.write(|s| {
            s.access_token = Some(token);
            s.user = Some(user);
        });
    }

    /// Forget the token and the user
    pub fn clear(&self) {
        self.write(|s| *s = SessionState::default());
    }

    pub fn is_authenticated(&self) -> bool {
        self.read(|s| s.access_token.is_some())
    }

    fn read<T>(&self, f: impl FnOnce(&SessionState) -> T) -> T {
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn write(&self, f: impl FnOnce(&mut SessionState)) {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
    }
}
