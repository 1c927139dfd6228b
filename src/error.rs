//! Session errors — one taxonomy for provider, navigation and setup failures.
//!
//! ERROR HANDLING
//! ==============
//! `AuthError` is `Clone` so the proxy can store the failure in the session
//! state and hand the same value back to the caller. Payloads are plain
//! strings; the identity client owns the structured protocol errors.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Errors surfaced by the session controller and its collaborators.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The provider redirected back with an error, or the callback could not be processed.
    #[error("sign-in callback failed: {0}")]
    Callback(String),

    /// Renewing the session without user interaction failed.
    #[error("silent renew failed: {0}")]
    SilentRenew(String),

    /// The popup flow failed or the window was closed before completing.
    #[error("popup flow failed: {0}")]
    Popup(String),

    /// Starting a redirect flow failed.
    #[error("redirect flow failed: {0}")]
    Redirect(String),

    /// A sign-out flow failed.
    #[error("sign-out failed: {0}")]
    Signout(String),

    /// Any other identity provider failure (discovery, transport, revocation).
    #[error("identity provider error: {0}")]
    Provider(String),

    /// The router rejected a navigation request.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// A configuration value was missing or malformed.
    #[error("config parse failed: {0}")]
    Config(String),

    /// A command was issued before any session controller was installed.
    #[error("session controller not installed")]
    NotInstalled,
}

impl AuthError {
    /// Stable machine-readable code for logs and UI mapping.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Callback(_) => "E_CALLBACK",
            Self::SilentRenew(_) => "E_SILENT_RENEW",
            Self::Popup(_) => "E_POPUP",
            Self::Redirect(_) => "E_REDIRECT",
            Self::Signout(_) => "E_SIGNOUT",
            Self::Provider(_) => "E_PROVIDER",
            Self::Navigation(_) => "E_NAVIGATION",
            Self::Config(_) => "E_CONFIG",
            Self::NotInstalled => "E_NOT_INSTALLED",
        }
    }
}
