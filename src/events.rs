//! Event bridge — keeps session state in step with identity client events.
//!
//! DESIGN
//! ======
//! Dispatch is split in two: [`transition`] maps an event to what should
//! happen (a pure table, testable without a client), and [`handle_event`]
//! carries it out. Handlers interleave freely with commands and bootstrap;
//! each write simply overwrites whatever was there.

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;

use futures::StreamExt;
use futures::channel::mpsc::UnboundedReceiver;

use crate::client::{ClientEvent, IdentityClient};
use crate::error::AuthError;
use crate::state::SessionState;
use crate::user::User;

/// What an event does to the session.
#[derive(Clone, Debug, PartialEq)]
pub enum Transition {
    /// Replace the user and settle `loading`.
    Apply(Option<User>),
    /// Store the error; leave user, authenticated and loading alone.
    RecordError(AuthError),
    /// Re-read the user from the client, then apply it.
    RefreshFromClient,
}

/// The fixed event-to-transition table.
#[must_use]
pub fn transition(event: &ClientEvent) -> Transition {
    match event {
        ClientEvent::UserLoaded(user) => Transition::Apply(Some(user.clone())),
        ClientEvent::UserUnloaded => Transition::Apply(None),
        ClientEvent::SilentRenewError(err) => Transition::RecordError(err.clone()),
        ClientEvent::AccessTokenExpired => Transition::RefreshFromClient,
    }
}

/// Apply one event to `state`, reading from `client` when the transition needs it.
pub async fn handle_event<C>(state: &SessionState, client: &C, event: ClientEvent)
where
    C: IdentityClient + ?Sized,
{
    match transition(&event) {
        Transition::Apply(user) => state.apply_user(user),
        Transition::RecordError(err) => {
            tracing::warn!(code = err.error_code(), %err, "background silent renew failed");
            state.record_error(err);
        }
        Transition::RefreshFromClient => match client.get_cached_user().await {
            Ok(user) => state.apply_user(user),
            Err(err) => tracing::warn!(%err, "reading user after token expiry failed"),
        },
    }
}

/// Drain `events` into `state` until every sender is dropped.
pub async fn run_event_bridge<C>(state: &SessionState, client: &C, mut events: UnboundedReceiver<ClientEvent>)
where
    C: IdentityClient + ?Sized,
{
    while let Some(event) = events.next().await {
        handle_event(state, client, event).await;
    }
    tracing::debug!("identity client event stream closed");
}
