//! Principal and command-argument types exchanged with the identity client.
//!
//! DESIGN
//! ======
//! `User` mirrors the record the identity client keeps for the signed-in
//! principal. The session controller reads only `expires_at` (for the
//! authenticated flag) and `state.to` (for post-login navigation); every
//! other field is carried through untouched.

#[cfg(test)]
#[path = "user_test.rs"]
mod user_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The signed-in principal as reported by the identity client.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Raw ID token, when the flow returned one.
    pub id_token: Option<String>,
    /// Bearer access token.
    pub access_token: String,
    /// Refresh token, when the provider issued one.
    pub refresh_token: Option<String>,
    /// Token type, normally `"Bearer"`.
    pub token_type: String,
    /// Granted scopes (space separated).
    pub scope: Option<String>,
    /// Provider session state used for session monitoring.
    pub session_state: Option<String>,
    /// ID token claims.
    #[serde(default)]
    pub profile: serde_json::Value,
    /// Access token expiry in seconds since the Unix epoch.
    pub expires_at: Option<i64>,
    /// Application state round-tripped through the sign-in flow.
    pub state: Option<serde_json::Value>,
}

impl User {
    /// Seconds until the access token expires, relative to `now` (may be negative).
    #[must_use]
    pub fn expires_in_at(&self, now: i64) -> Option<i64> {
        self.expires_at.map(|at| at - now)
    }

    /// Whether the access token has expired at `now`. Users without an expiry never expire.
    #[must_use]
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_in_at(now).is_some_and(|remaining| remaining <= 0)
    }

    /// Whether the access token has expired according to the platform clock.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.is_expired_at(unix_now())
    }

    /// Post-login navigation target carried in `state.to`, if any.
    #[must_use]
    pub fn navigation_target(&self) -> Option<&str> {
        self.state.as_ref()?.get("to")?.as_str()
    }
}

/// Current Unix time in seconds.
#[cfg(feature = "hydrate")]
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn unix_now() -> i64 {
    (js_sys::Date::now() / 1000.0) as i64
}

/// Current Unix time in seconds.
#[cfg(not(feature = "hydrate"))]
pub(crate) fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
}

/// Provider session status returned by a session query.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    /// Opaque provider session state.
    pub session_state: String,
    /// Subject identifier.
    pub sub: Option<String>,
    /// Provider session id.
    pub sid: Option<String>,
}

/// Arguments for the popup, redirect and silent sign-in flows.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SigninArgs {
    /// Application state to round-trip; `{ "to": "/path" }` drives post-login navigation.
    pub state: Option<serde_json::Value>,
    pub scope: Option<String>,
    pub prompt: Option<String>,
    pub login_hint: Option<String>,
    #[serde(default)]
    pub extra_query_params: BTreeMap<String, String>,
}

impl SigninArgs {
    /// Sign-in arguments that return the user to `path` after the callback.
    #[must_use]
    pub fn returning_to(path: &str) -> Self {
        Self { state: Some(serde_json::json!({ "to": path })), ..Self::default() }
    }
}

/// Arguments for the popup, redirect and silent sign-out flows.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SignoutArgs {
    pub state: Option<serde_json::Value>,
    pub id_token_hint: Option<String>,
    pub post_logout_redirect_uri: Option<String>,
    #[serde(default)]
    pub extra_query_params: BTreeMap<String, String>,
}
