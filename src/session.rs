//! Session controller — wires the identity client, state, proxy and bridge.
//!
//! ARCHITECTURE
//! ============
//! `OidcSession::new` subscribes the event bridge, `start` runs the
//! bootstrap reconciler once (through the command proxy, which is what
//! settles `loading` on every path) and `run_events` drains provider events
//! for the rest of the page's life. Under `hydrate`, [`install`] does all
//! three and spawns the long-running parts on the browser event loop.
//!
//! The app reaches the controller through an `Rc<dyn OidcAuth>` handle.
//! Components under the installing component find it in Leptos context;
//! everything else falls back to a per-thread registry. Until something is
//! installed the registry holds [`NotInstalled`], which logs every command
//! instead of silently ignoring it.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::mpsc::{self, UnboundedReceiver};
use leptos::prelude::{GetValue, LocalStorage, StoredValue, provide_context, use_context};

use crate::client::{ClientEvent, IdentityClient};
use crate::config::ClientSettings;
use crate::error::AuthError;
use crate::events::run_event_bridge;
use crate::navigation::{Location, Navigator};
use crate::proxy::proxy;
use crate::reconcile::reconcile;
use crate::state::SessionState;
use crate::user::{SessionStatus, SigninArgs, SignoutArgs, User};

// =============================================================================
// HANDLE
// =============================================================================

/// Everything the app can observe and ask of the session.
///
/// Sign-in and sign-out commands go through the command proxy and update
/// `loading`/`error`; the maintenance commands call the identity client
/// directly and leave the state alone.
#[async_trait(?Send)]
pub trait OidcAuth {
    /// Observable session state.
    fn state(&self) -> SessionState;

    /// `false` only for the [`NotInstalled`] placeholder.
    fn is_installed(&self) -> bool {
        true
    }

    async fn signin_popup(&self, args: Option<SigninArgs>) -> Result<Option<User>, AuthError>;
    async fn signin_silent(&self, args: Option<SigninArgs>) -> Result<Option<User>, AuthError>;
    async fn signin_redirect(&self, args: Option<SigninArgs>) -> Result<(), AuthError>;
    async fn signout_popup(&self, args: Option<SignoutArgs>) -> Result<(), AuthError>;
    async fn signout_redirect(&self, args: Option<SignoutArgs>) -> Result<(), AuthError>;
    async fn signout_silent(&self, args: Option<SignoutArgs>) -> Result<(), AuthError>;

    async fn clear_stale_state(&self) -> Result<(), AuthError>;
    async fn query_session_status(&self) -> Result<Option<SessionStatus>, AuthError>;
    async fn revoke_tokens(&self) -> Result<(), AuthError>;
    async fn start_silent_renew(&self) -> Result<(), AuthError>;
    async fn stop_silent_renew(&self) -> Result<(), AuthError>;
}

// =============================================================================
// CONTROLLER
// =============================================================================

pub struct OidcSession<C: IdentityClient> {
    client: C,
    settings: ClientSettings,
    state: SessionState,
    events: RefCell<Option<UnboundedReceiver<ClientEvent>>>,
    started: Cell<bool>,
}

impl<C: IdentityClient> OidcSession<C> {
    /// Build the controller and subscribe its event bridge to `client`.
    pub fn new(client: C, settings: ClientSettings) -> Self {
        let (sink, events) = mpsc::unbounded();
        client.subscribe(sink);
        Self {
            client,
            settings,
            state: SessionState::new(),
            events: RefCell::new(Some(events)),
            started: Cell::new(false),
        }
    }

    #[must_use]
    pub fn client(&self) -> &C {
        &self.client
    }

    #[must_use]
    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Run the bootstrap reconciler. Only the first call does anything.
    pub async fn start(&self, location: &dyn Location, navigator: Option<&dyn Navigator>) {
        if self.started.replace(true) {
            tracing::warn!("session bootstrap already ran; ignoring second start");
            return;
        }
        let bootstrap = proxy(&self.state, || async {
            reconcile(&self.state, &self.client, &self.settings, location, navigator).await;
            Ok::<(), AuthError>(())
        });
        if let Err(err) = bootstrap.await {
            tracing::error!(%err, "session bootstrap reported an error");
        }
    }

    /// Forward identity client events into the state until the client drops its sink.
    pub async fn run_events(&self) {
        let Some(events) = self.events.borrow_mut().take() else {
            tracing::warn!("event bridge already running");
            return;
        };
        run_event_bridge(&self.state, &self.client, events).await;
    }
}

#[async_trait(?Send)]
impl<C: IdentityClient> OidcAuth for OidcSession<C> {
    fn state(&self) -> SessionState {
        self.state.clone()
    }

    async fn signin_popup(&self, args: Option<SigninArgs>) -> Result<Option<User>, AuthError> {
        proxy(&self.state, || self.client.signin_popup(args)).await.map(Some)
    }

    async fn signin_silent(&self, args: Option<SigninArgs>) -> Result<Option<User>, AuthError> {
        proxy(&self.state, || self.client.signin_silent(args)).await
    }

    async fn signin_redirect(&self, args: Option<SigninArgs>) -> Result<(), AuthError> {
        proxy(&self.state, || self.client.signin_redirect(args)).await
    }

    async fn signout_popup(&self, args: Option<SignoutArgs>) -> Result<(), AuthError> {
        proxy(&self.state, || self.client.signout_popup(args)).await
    }

    async fn signout_redirect(&self, args: Option<SignoutArgs>) -> Result<(), AuthError> {
        proxy(&self.state, || self.client.signout_redirect(args)).await
    }

    async fn signout_silent(&self, args: Option<SignoutArgs>) -> Result<(), AuthError> {
        proxy(&self.state, || self.client.signout_silent(args)).await
    }

    async fn clear_stale_state(&self) -> Result<(), AuthError> {
        self.client.clear_stale_state().await
    }

    async fn query_session_status(&self) -> Result<Option<SessionStatus>, AuthError> {
        self.client.query_session_status().await
    }

    async fn revoke_tokens(&self) -> Result<(), AuthError> {
        self.client.revoke_tokens().await
    }

    async fn start_silent_renew(&self) -> Result<(), AuthError> {
        self.client.start_silent_renew().await
    }

    async fn stop_silent_renew(&self) -> Result<(), AuthError> {
        self.client.stop_silent_renew().await
    }
}

// =============================================================================
// NOT INSTALLED
// =============================================================================

/// Placeholder handle used before any controller is installed.
///
/// Commands log a configuration error and resolve to the neutral value; the
/// state reports a settled, signed-out session.
pub struct NotInstalled {
    state: SessionState,
}

impl NotInstalled {
    #[must_use]
    pub fn new() -> Self {
        Self { state: SessionState::idle() }
    }
}

impl Default for NotInstalled {
    fn default() -> Self {
        Self::new()
    }
}

fn report_not_installed(command: &'static str) {
    tracing::error!(command, "{}; install the session controller before issuing commands", AuthError::NotInstalled);
}

#[async_trait(?Send)]
impl OidcAuth for NotInstalled {
    fn state(&self) -> SessionState {
        self.state.clone()
    }

    fn is_installed(&self) -> bool {
        false
    }

    async fn signin_popup(&self, _args: Option<SigninArgs>) -> Result<Option<User>, AuthError> {
        report_not_installed("signin_popup");
        Ok(None)
    }

    async fn signin_silent(&self, _args: Option<SigninArgs>) -> Result<Option<User>, AuthError> {
        report_not_installed("signin_silent");
        Ok(None)
    }

    async fn signin_redirect(&self, _args: Option<SigninArgs>) -> Result<(), AuthError> {
        report_not_installed("signin_redirect");
        Ok(())
    }

    async fn signout_popup(&self, _args: Option<SignoutArgs>) -> Result<(), AuthError> {
        report_not_installed("signout_popup");
        Ok(())
    }

    async fn signout_redirect(&self, _args: Option<SignoutArgs>) -> Result<(), AuthError> {
        report_not_installed("signout_redirect");
        Ok(())
    }

    async fn signout_silent(&self, _args: Option<SignoutArgs>) -> Result<(), AuthError> {
        report_not_installed("signout_silent");
        Ok(())
    }

    async fn clear_stale_state(&self) -> Result<(), AuthError> {
        report_not_installed("clear_stale_state");
        Ok(())
    }

    async fn query_session_status(&self) -> Result<Option<SessionStatus>, AuthError> {
        report_not_installed("query_session_status");
        Ok(None)
    }

    async fn revoke_tokens(&self) -> Result<(), AuthError> {
        report_not_installed("revoke_tokens");
        Ok(())
    }

    async fn start_silent_renew(&self) -> Result<(), AuthError> {
        report_not_installed("start_silent_renew");
        Ok(())
    }

    async fn stop_silent_renew(&self) -> Result<(), AuthError> {
        report_not_installed("stop_silent_renew");
        Ok(())
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

thread_local! {
    static CURRENT: RefCell<Rc<dyn OidcAuth>> = RefCell::new(Rc::new(NotInstalled::new()));
}

/// Context entry for the handle. `Rc` is not `Send`, so it sits in local storage.
#[derive(Clone, Copy)]
struct AuthContext(StoredValue<Rc<dyn OidcAuth>, LocalStorage>);

/// Expose `handle` to the current component and its descendants.
pub fn provide_oidc_auth(handle: Rc<dyn OidcAuth>) {
    provide_context(AuthContext(StoredValue::new_local(handle)));
}

/// The session handle from context, else the registered one, else the [`NotInstalled`] placeholder.
#[must_use]
pub fn use_oidc_auth() -> Rc<dyn OidcAuth> {
    use_context::<AuthContext>()
        .and_then(|ctx| ctx.0.try_get_value())
        .unwrap_or_else(|| CURRENT.with(|current| Rc::clone(&current.borrow())))
}

/// Make `handle` the current session. Replaces any earlier registration.
pub fn register(handle: Rc<dyn OidcAuth>) {
    CURRENT.with(|current| *current.borrow_mut() = handle);
}

#[must_use]
pub fn is_installed() -> bool {
    use_oidc_auth().is_installed()
}

#[cfg(test)]
pub(crate) fn reset_registry() {
    register(Rc::new(NotInstalled::new()));
}

/// Build, register and start a session in the browser.
///
/// Initialises logging from `settings.log_level`, registers the session and
/// provides it as context, then spawns the event bridge and the bootstrap on
/// the Leptos executor. The session outlives the calling component.
#[cfg(feature = "hydrate")]
pub fn install<C: IdentityClient>(
    client: C,
    settings: ClientSettings,
    navigator: Option<Rc<dyn Navigator>>,
) -> Rc<OidcSession<C>> {
    crate::logging::init_logging(settings.log_level);

    let session = Rc::new(OidcSession::new(client, settings));
    register(session.clone());
    provide_oidc_auth(session.clone());

    let events = Rc::clone(&session);
    leptos::task::spawn_local(async move { events.run_events().await });

    let bootstrap = Rc::clone(&session);
    leptos::task::spawn_local(async move {
        let location = crate::navigation::BrowserLocation;
        bootstrap.start(&location, navigator.as_deref()).await;
    });

    session
}
