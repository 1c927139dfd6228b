//! Identity client contract — the black box doing every protocol operation.
//!
//! The controller never talks to the provider itself. Implementations wrap a
//! concrete OIDC library (in the browser usually through `wasm-bindgen`);
//! tests use a scripted in-memory client. Futures are `?Send` because the
//! browser event loop is single threaded.

use async_trait::async_trait;
use futures::channel::mpsc;

use crate::error::AuthError;
use crate::user::{SessionStatus, SigninArgs, SignoutArgs, User};

/// Lifecycle events emitted by the identity client outside explicit commands.
#[derive(Clone, Debug, PartialEq)]
pub enum ClientEvent {
    /// A user was loaded or refreshed into the client's store.
    UserLoaded(User),
    /// The stored user was removed.
    UserUnloaded,
    /// A background silent renew failed.
    SilentRenewError(AuthError),
    /// The access token reached its expiry.
    AccessTokenExpired,
}

/// Channel end the identity client pushes its events into.
pub type EventSink = mpsc::UnboundedSender<ClientEvent>;

#[async_trait(?Send)]
pub trait IdentityClient: 'static {
    /// Process the provider's redirect back to `url`. Fails on malformed or rejected callbacks.
    async fn complete_callback(&self, url: &str) -> Result<Option<User>, AuthError>;

    /// The user currently held in the client's store.
    async fn get_cached_user(&self) -> Result<Option<User>, AuthError>;

    async fn signin_silent(&self, args: Option<SigninArgs>) -> Result<Option<User>, AuthError>;

    async fn signin_popup(&self, args: Option<SigninArgs>) -> Result<User, AuthError>;

    async fn signin_redirect(&self, args: Option<SigninArgs>) -> Result<(), AuthError>;

    async fn signout_popup(&self, args: Option<SignoutArgs>) -> Result<(), AuthError>;

    async fn signout_redirect(&self, args: Option<SignoutArgs>) -> Result<(), AuthError>;

    async fn signout_silent(&self, args: Option<SignoutArgs>) -> Result<(), AuthError>;

    /// Remove abandoned sign-in state left behind by interrupted flows.
    async fn clear_stale_state(&self) -> Result<(), AuthError>;

    async fn query_session_status(&self) -> Result<Option<SessionStatus>, AuthError>;

    async fn revoke_tokens(&self) -> Result<(), AuthError>;

    async fn start_silent_renew(&self) -> Result<(), AuthError>;

    async fn stop_silent_renew(&self) -> Result<(), AuthError>;

    /// Register `sink` to receive every subsequent [`ClientEvent`].
    fn subscribe(&self, sink: EventSink);
}
