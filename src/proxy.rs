//! Command proxy — uniform loading/error bookkeeping around provider calls.
//!
//! ERROR HANDLING
//! ==============
//! Failures are reported twice: stored in `SessionState.error` for reactive
//! observers and returned to the imperative caller. A success clears the
//! previous error.

#[cfg(test)]
#[path = "proxy_test.rs"]
mod proxy_test;

use std::future::Future;

use crate::error::AuthError;
use crate::state::SessionState;

/// Run `operation` with `loading` raised, then settle `loading` and `error` from its outcome.
///
/// `operation` is only invoked after `loading` has been set.
///
/// # Errors
///
/// Returns the operation's error unchanged after recording it in `state`.
pub async fn proxy<T, F, Fut>(state: &SessionState, operation: F) -> Result<T, AuthError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, AuthError>>,
{
    state.begin();
    match operation().await {
        Ok(value) => {
            state.finish_ok();
            Ok(value)
        }
        Err(err) => {
            tracing::debug!(code = err.error_code(), %err, "proxied command failed");
            state.finish_err(err.clone());
            Err(err)
        }
    }
}
