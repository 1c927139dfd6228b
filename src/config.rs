//! Identity client settings consumed at construction.
//!
//! Settings come either from environment variables (native and SSR hosts)
//! or from a JSON blob injected into the page at runtime. Only the silent
//! renew pair is interpreted by the controller; the rest is handed to the
//! identity client as-is.

use serde::Deserialize;

use crate::error::AuthError;
use crate::logging::LogLevel;

pub const DEFAULT_SCOPE: &str = "openid";
pub const DEFAULT_RESPONSE_TYPE: &str = "code";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSettings {
    pub authority: String,
    pub client_id: String,
    pub redirect_uri: String,
    #[serde(default)]
    pub silent_redirect_uri: Option<String>,
    #[serde(default)]
    pub post_logout_redirect_uri: Option<String>,
    #[serde(default = "default_scope")]
    pub scope: String,
    #[serde(default = "default_response_type")]
    pub response_type: String,
    #[serde(default)]
    pub automatic_silent_renew: bool,
    #[serde(default)]
    pub log_level: LogLevel,
}

impl ClientSettings {
    /// Settings with the required fields and every option at its default.
    #[must_use]
    pub fn new(authority: &str, client_id: &str, redirect_uri: &str) -> Self {
        Self {
            authority: authority.to_owned(),
            client_id: client_id.to_owned(),
            redirect_uri: redirect_uri.to_owned(),
            silent_redirect_uri: None,
            post_logout_redirect_uri: None,
            scope: DEFAULT_SCOPE.to_owned(),
            response_type: DEFAULT_RESPONSE_TYPE.to_owned(),
            automatic_silent_renew: false,
            log_level: LogLevel::None,
        }
    }

    /// Build settings from environment variables.
    ///
    /// Required:
    /// - `OIDC_AUTHORITY`
    /// - `OIDC_CLIENT_ID`
    /// - `OIDC_REDIRECT_URI`
    ///
    /// Optional:
    /// - `OIDC_SILENT_REDIRECT_URI`
    /// - `OIDC_POST_LOGOUT_REDIRECT_URI`
    /// - `OIDC_SCOPE`: default `openid`
    /// - `OIDC_RESPONSE_TYPE`: default `code`
    /// - `OIDC_AUTOMATIC_SILENT_RENEW`: `true`/`false`, default `false`
    /// - `OIDC_LOG_LEVEL`: `none` (default), `error`, `warn`, `info`, `debug` or `0`..`4`
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Config` if a required variable is missing or a value is malformed.
    pub fn from_env() -> Result<Self, AuthError> {
        let settings = Self {
            authority: required_env("OIDC_AUTHORITY")?,
            client_id: required_env("OIDC_CLIENT_ID")?,
            redirect_uri: required_env("OIDC_REDIRECT_URI")?,
            silent_redirect_uri: optional_env("OIDC_SILENT_REDIRECT_URI"),
            post_logout_redirect_uri: optional_env("OIDC_POST_LOGOUT_REDIRECT_URI"),
            scope: optional_env("OIDC_SCOPE").unwrap_or_else(default_scope),
            response_type: optional_env("OIDC_RESPONSE_TYPE").unwrap_or_else(default_response_type),
            automatic_silent_renew: parse_bool(optional_env("OIDC_AUTOMATIC_SILENT_RENEW").as_deref())?,
            log_level: optional_env("OIDC_LOG_LEVEL").map_or(Ok(LogLevel::None), |raw| LogLevel::parse(&raw))?,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from a runtime JSON blob.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Config` if the JSON is malformed or fails validation.
    pub fn from_json(raw: &str) -> Result<Self, AuthError> {
        let settings: Self = serde_json::from_str(raw).map_err(|e| AuthError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the identity client could never use.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<(), AuthError> {
        if !(self.authority.starts_with("https://") || self.authority.starts_with("http://")) {
            return Err(AuthError::Config(format!("authority must be an http(s) URL: '{}'", self.authority)));
        }
        if self.client_id.trim().is_empty() {
            return Err(AuthError::Config("client_id is empty".into()));
        }
        if self.redirect_uri.trim().is_empty() {
            return Err(AuthError::Config("redirect_uri is empty".into()));
        }
        Ok(())
    }

    /// Whether bootstrap should try a silent sign-in before settling on the cached user.
    #[must_use]
    pub fn should_attempt_silent_renew(&self) -> bool {
        self.automatic_silent_renew && self.silent_redirect_uri.is_some()
    }
}

fn default_scope() -> String {
    DEFAULT_SCOPE.to_owned()
}

fn default_response_type() -> String {
    DEFAULT_RESPONSE_TYPE.to_owned()
}

fn required_env(key: &str) -> Result<String, AuthError> {
    optional_env(key).ok_or_else(|| AuthError::Config(format!("{key} not set")))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(raw: Option<&str>) -> Result<bool, AuthError> {
    match raw.map(str::trim) {
        None => Ok(false),
        Some("true" | "1" | "yes") => Ok(true),
        Some("false" | "0" | "no") => Ok(false),
        Some(other) => Err(AuthError::Config(format!("expected a boolean, got '{other}'"))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
