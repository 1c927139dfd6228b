//! Reactive auth-session state shared by the controller and the UI.
//!
//! SYSTEM CONTEXT
//! ==============
//! User-aware components read these signals; only the
//! reconciler, the command proxy and the event bridge write them.
//!
//! DESIGN
//! ======
//! Each field is its own `ArcRwSignal` so components subscribe to just what
//! they render. The signals are reference counted rather than arena-owned:
//! the state lives as long as any handle to it, not as long as the component
//! that happened to build it. Writes are plain last-writer-wins: there is no
//! busy counter, so `loading` reflects whichever operation resolved most
//! recently.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use leptos::prelude::*;

use crate::error::AuthError;
use crate::user::User;

/// The authenticated rule: a present, unexpired user.
#[must_use]
pub fn is_authenticated(user: Option<&User>) -> bool {
    user.is_some_and(|u| !u.expired())
}

/// Authentication state tracking the current user, loading and last error.
#[derive(Clone, Debug)]
pub struct SessionState {
    loading: ArcRwSignal<bool>,
    authenticated: ArcRwSignal<bool>,
    user: ArcRwSignal<Option<User>>,
    error: ArcRwSignal<Option<AuthError>>,
}

/// Plain copy of the four fields at one point in time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionSnapshot {
    pub loading: bool,
    pub authenticated: bool,
    pub user: Option<User>,
    pub error: Option<AuthError>,
}

impl SessionState {
    /// Fresh install-time state: loading until bootstrap applies a user.
    #[must_use]
    pub fn new() -> Self {
        Self::with_loading(true)
    }

    /// Settled, signed-out state reported when no controller is installed.
    #[must_use]
    pub fn idle() -> Self {
        Self::with_loading(false)
    }

    fn with_loading(loading: bool) -> Self {
        Self {
            loading: ArcRwSignal::new(loading),
            authenticated: ArcRwSignal::new(false),
            user: ArcRwSignal::new(None),
            error: ArcRwSignal::new(None),
        }
    }

    // =========================================================================
    // READ-ONLY OBSERVABLES
    // =========================================================================

    #[must_use]
    pub fn loading(&self) -> ArcReadSignal<bool> {
        self.loading.read_only()
    }

    #[must_use]
    pub fn authenticated(&self) -> ArcReadSignal<bool> {
        self.authenticated.read_only()
    }

    #[must_use]
    pub fn user(&self) -> ArcReadSignal<Option<User>> {
        self.user.read_only()
    }

    #[must_use]
    pub fn error(&self) -> ArcReadSignal<Option<AuthError>> {
        self.error.read_only()
    }

    /// Current values without subscribing the caller.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            loading: self.loading.get_untracked(),
            authenticated: self.authenticated.get_untracked(),
            user: self.user.get_untracked(),
            error: self.error.get_untracked(),
        }
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    /// Replace the user wholesale and settle `loading`. The only writer of `authenticated`.
    pub fn apply_user(&self, user: Option<User>) {
        self.authenticated.set(is_authenticated(user.as_ref()));
        self.user.set(user);
        self.loading.set(false);
    }

    /// Record a failure without touching `loading`, `user` or `authenticated`.
    pub fn record_error(&self, error: AuthError) {
        self.error.set(Some(error));
    }

    pub(crate) fn begin(&self) {
        self.loading.set(true);
    }

    pub(crate) fn finish_ok(&self) {
        self.loading.set(false);
        self.error.set(None);
    }

    pub(crate) fn finish_err(&self, error: AuthError) {
        self.loading.set(false);
        self.error.set(Some(error));
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
