//! Authenticated identity of the session.

use crate::domain::UserIdentity;

/// User state container
#[derive(Debug, Default)]
pub struct UserStore {
    user: Option<UserIdentity>,
    authenticated: bool,
    loading: bool,
    error: Option<String>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an owned copy of `user`; `None` signs the session out.
    pub fn set_user(&mut self, user: Option<&UserIdentity>) {
        self.user = user.cloned();
        self.authenticated = self.user.is_some();
        self.loading = false;
        self.error = None;
    }

    pub fn clear_user(&mut self) {
        self.set_user(None);
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.loading = false;
    }

    pub fn user(&self) -> Option<&UserIdentity> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
