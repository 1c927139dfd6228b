//! Scripted collaborators for unit tests.

use std::cell::RefCell;

use async_trait::async_trait;
use futures::channel::oneshot;

use crate::client::{ClientEvent, EventSink, IdentityClient};
use crate::error::AuthError;
use crate::navigation::Navigator;
use crate::user::{SessionStatus, SigninArgs, SignoutArgs, User, unix_now};

pub fn live_user(to: Option<&str>) -> User {
    User {
        access_token: "at-live".to_owned(),
        token_type: "Bearer".to_owned(),
        expires_at: Some(unix_now() + 3_600),
        state: to.map(|path| serde_json::json!({ "to": path })),
        ..User::default()
    }
}

pub fn expired_user() -> User {
    User {
        access_token: "at-expired".to_owned(),
        token_type: "Bearer".to_owned(),
        expires_at: Some(1),
        ..User::default()
    }
}

// =============================================================================
// SCRIPTED CLIENT
// =============================================================================

/// Identity client whose answers are set up front. Every call is logged by name.
pub struct ScriptedClient {
    pub callback: RefCell<Result<Option<User>, AuthError>>,
    pub cached: RefCell<Result<Option<User>, AuthError>>,
    pub silent: RefCell<Result<Option<User>, AuthError>>,
    pub popup: RefCell<Result<User, AuthError>>,
    pub status: RefCell<Option<SessionStatus>>,
    /// Error returned by every `()`-returning operation, when set.
    pub unit_error: RefCell<Option<AuthError>>,
    /// When set, `signin_popup` waits for this gate before answering.
    pub popup_gate: RefCell<Option<oneshot::Receiver<()>>>,
    calls: RefCell<Vec<String>>,
    signin_args: RefCell<Vec<Option<SigninArgs>>>,
    signout_args: RefCell<Vec<Option<SignoutArgs>>>,
    sinks: RefCell<Vec<EventSink>>,
}

impl Default for ScriptedClient {
    fn default() -> Self {
        Self {
            callback: RefCell::new(Ok(None)),
            cached: RefCell::new(Ok(None)),
            silent: RefCell::new(Ok(None)),
            popup: RefCell::new(Err(AuthError::Popup("not scripted".into()))),
            status: RefCell::new(None),
            unit_error: RefCell::new(None),
            popup_gate: RefCell::new(None),
            calls: RefCell::new(Vec::new()),
            signin_args: RefCell::new(Vec::new()),
            signout_args: RefCell::new(Vec::new()),
            sinks: RefCell::new(Vec::new()),
        }
    }
}

impl ScriptedClient {
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn signin_args(&self) -> Vec<Option<SigninArgs>> {
        self.signin_args.borrow().clone()
    }

    pub fn signout_args(&self) -> Vec<Option<SignoutArgs>> {
        self.signout_args.borrow().clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sinks.borrow().len()
    }

    /// Push `event` to every subscriber.
    pub fn emit(&self, event: ClientEvent) {
        for sink in self.sinks.borrow().iter() {
            let _ = sink.unbounded_send(event.clone());
        }
    }

    /// Drop every sink so event loops run to completion.
    pub fn close_events(&self) {
        self.sinks.borrow_mut().clear();
    }

    fn log(&self, name: &str) {
        self.calls.borrow_mut().push(name.to_owned());
    }

    fn unit(&self, name: &str) -> Result<(), AuthError> {
        self.log(name);
        self.unit_error.borrow().clone().map_or(Ok(()), Err)
    }

    fn signout(&self, name: &str, args: Option<SignoutArgs>) -> Result<(), AuthError> {
        self.signout_args.borrow_mut().push(args);
        self.unit(name)
    }
}

#[async_trait(?Send)]
impl IdentityClient for ScriptedClient {
    async fn complete_callback(&self, url: &str) -> Result<Option<User>, AuthError> {
        self.log(&format!("complete_callback {url}"));
        self.callback.borrow().clone()
    }

    async fn get_cached_user(&self) -> Result<Option<User>, AuthError> {
        self.log("get_cached_user");
        self.cached.borrow().clone()
    }

    async fn signin_silent(&self, args: Option<SigninArgs>) -> Result<Option<User>, AuthError> {
        self.log("signin_silent");
        self.signin_args.borrow_mut().push(args);
        self.silent.borrow().clone()
    }

    async fn signin_popup(&self, args: Option<SigninArgs>) -> Result<User, AuthError> {
        self.log("signin_popup");
        self.signin_args.borrow_mut().push(args);
        let gate = self.popup_gate.borrow_mut().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.popup.borrow().clone()
    }

    async fn signin_redirect(&self, args: Option<SigninArgs>) -> Result<(), AuthError> {
        self.signin_args.borrow_mut().push(args);
        self.unit("signin_redirect")
    }

    async fn signout_popup(&self, args: Option<SignoutArgs>) -> Result<(), AuthError> {
        self.signout("signout_popup", args)
    }

    async fn signout_redirect(&self, args: Option<SignoutArgs>) -> Result<(), AuthError> {
        self.signout("signout_redirect", args)
    }

    async fn signout_silent(&self, args: Option<SignoutArgs>) -> Result<(), AuthError> {
        self.signout("signout_silent", args)
    }

    async fn clear_stale_state(&self) -> Result<(), AuthError> {
        self.unit("clear_stale_state")
    }

    async fn query_session_status(&self) -> Result<Option<SessionStatus>, AuthError> {
        self.log("query_session_status");
        Ok(self.status.borrow().clone())
    }

    async fn revoke_tokens(&self) -> Result<(), AuthError> {
        self.unit("revoke_tokens")
    }

    async fn start_silent_renew(&self) -> Result<(), AuthError> {
        self.unit("start_silent_renew")
    }

    async fn stop_silent_renew(&self) -> Result<(), AuthError> {
        self.unit("stop_silent_renew")
    }

    fn subscribe(&self, sink: EventSink) {
        self.sinks.borrow_mut().push(sink);
    }
}

// =============================================================================
// RECORDING NAVIGATOR
// =============================================================================

/// Navigator that records `replace:<path>` / `push:<path>` entries.
#[derive(Default)]
pub struct RecordingNavigator {
    pub fail: RefCell<Option<AuthError>>,
    visits: RefCell<Vec<String>>,
}

impl RecordingNavigator {
    pub fn visits(&self) -> Vec<String> {
        self.visits.borrow().clone()
    }

    fn record(&self, entry: String) -> Result<(), AuthError> {
        self.visits.borrow_mut().push(entry);
        self.fail.borrow().clone().map_or(Ok(()), Err)
    }
}

#[async_trait(?Send)]
impl Navigator for RecordingNavigator {
    async fn replace(&self, path: &str) -> Result<(), AuthError> {
        self.record(format!("replace:{path}"))
    }

    async fn push(&self, path: &str) -> Result<(), AuthError> {
        self.record(format!("push:{path}"))
    }
}
