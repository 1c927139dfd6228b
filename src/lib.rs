//! # oidc-session
//!
//! Reactive OpenID Connect session controller for Leptos single-page apps.
//!
//! The crate owns four signals (`loading`, `authenticated`, `user`, `error`)
//! and keeps them correct across page-load bootstrap, provider redirect
//! callbacks and background token events. Protocol work is delegated to an
//! [`IdentityClient`] implementation; routing and the address bar are
//! reached through [`Navigator`] and [`Location`].

pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod navigation;
pub mod proxy;
pub mod reconcile;
pub mod session;
pub mod state;
pub mod user;

#[cfg(test)]
mod test_support;

pub use client::{ClientEvent, EventSink, IdentityClient};
pub use config::ClientSettings;
pub use error::AuthError;
pub use logging::{LogLevel, init_logging};
pub use navigation::{Location, MemoryLocation, Navigator, RouteNavigator};
pub use session::{
    NotInstalled, OidcAuth, OidcSession, is_installed, provide_oidc_auth, register, use_oidc_auth,
};
pub use state::{SessionSnapshot, SessionState};
pub use user::{SessionStatus, SigninArgs, SignoutArgs, User};

#[cfg(feature = "hydrate")]
pub use navigation::BrowserLocation;
#[cfg(feature = "hydrate")]
pub use session::install;
