//! Bootstrap reconciler — works out who the user is once per page load.
//!
//! SYSTEM CONTEXT
//! ==============
//! Runs once at start-up, inside the command proxy, before the app issues
//! its own commands. The page is either the provider's redirect back to us
//! (finish the sign-in) or an ordinary load (resume the stored session,
//! optionally renewing it silently).
//!
//! ERROR HANDLING
//! ==============
//! Every failure lands in one recovery path: clean the address bar and
//! send the router home. Nothing is stored in `SessionState.error` and
//! nothing is returned; bootstrap must never leave the app stuck.

#[cfg(test)]
#[path = "reconcile_test.rs"]
mod reconcile_test;

use crate::client::IdentityClient;
use crate::config::ClientSettings;
use crate::error::AuthError;
use crate::navigation::{Location, Navigator, bare_path};
use crate::state::SessionState;
use crate::user::User;

/// Root route used after callbacks without a target and after failures.
pub const HOME_PATH: &str = "/";

/// Whether `search` looks like a provider redirect: `state=` plus `code=` or `error=`.
///
/// Substring match on the raw query string, not protocol parsing.
#[must_use]
pub fn is_callback(search: &str) -> bool {
    search.contains("state=") && (search.contains("code=") || search.contains("error="))
}

/// Reconcile `state` with the page URL and the identity client's stored session.
pub async fn reconcile<C>(
    state: &SessionState,
    client: &C,
    settings: &ClientSettings,
    location: &dyn Location,
    navigator: Option<&dyn Navigator>,
) where
    C: IdentityClient + ?Sized,
{
    let outcome = if is_callback(&location.search()) {
        tracing::debug!("resuming sign-in callback");
        resume_callback(state, client, location, navigator).await
    } else {
        tracing::debug!(silent_renew = settings.should_attempt_silent_renew(), "resuming stored session");
        resume_session(state, client, settings).await
    };

    if let Err(err) = outcome {
        tracing::warn!(code = err.error_code(), %err, "session bootstrap failed; returning home");
        recover(location, navigator).await;
    }
}

async fn resume_callback<C>(
    state: &SessionState,
    client: &C,
    location: &dyn Location,
    navigator: Option<&dyn Navigator>,
) -> Result<(), AuthError>
where
    C: IdentityClient + ?Sized,
{
    let href = location.href();
    let user = client.complete_callback(&href).await?;
    location.replace_with(bare_path(&href))?;

    if let Some(navigator) = navigator {
        let target = user.as_ref().and_then(User::navigation_target).unwrap_or(HOME_PATH);
        navigator.replace(target).await?;
    }
    if let Some(user) = user {
        state.apply_user(Some(user));
    }
    Ok(())
}

async fn resume_session<C>(state: &SessionState, client: &C, settings: &ClientSettings) -> Result<(), AuthError>
where
    C: IdentityClient + ?Sized,
{
    let cached = client.get_cached_user().await?;
    if !settings.should_attempt_silent_renew() {
        state.apply_user(cached);
        return Ok(());
    }

    match client.signin_silent(None).await {
        Ok(refreshed) => {
            state.apply_user(refreshed);
            Ok(())
        }
        Err(err) => {
            state.apply_user(cached);
            Err(err)
        }
    }
}

/// Strip the query string and route home. Failures here are only logged.
async fn recover(location: &dyn Location, navigator: Option<&dyn Navigator>) {
    let href = location.href();
    if let Err(err) = location.replace_with(bare_path(&href)) {
        tracing::warn!(%err, "could not clean the address bar");
    }
    if let Some(navigator) = navigator {
        if let Err(err) = navigator.push(HOME_PATH).await {
            tracing::warn!(%err, "could not route home after bootstrap failure");
        }
    }
}
