//! Router and address-bar collaborators used during bootstrap.
//!
//! Client-side (hydrate): `BrowserLocation` reads `window.location` and
//! rewrites the current history entry.
//! Native/SSR: `MemoryLocation` keeps the URL in memory so the same
//! bootstrap code runs in tests and on the server.

#[cfg(test)]
#[path = "navigation_test.rs"]
mod navigation_test;

use std::cell::RefCell;

use async_trait::async_trait;
use leptos_router::NavigateOptions;

use crate::error::AuthError;

// =============================================================================
// ROUTER
// =============================================================================

/// Client-side router used for post-login and failure navigation.
#[async_trait(?Send)]
pub trait Navigator {
    /// Replace the current route.
    async fn replace(&self, path: &str) -> Result<(), AuthError>;

    /// Push a new route onto the history stack.
    async fn push(&self, path: &str) -> Result<(), AuthError>;
}

/// [`Navigator`] over a `leptos_router` navigate function (see `use_navigate`).
#[derive(Clone)]
pub struct RouteNavigator<F> {
    navigate: F,
}

impl<F> RouteNavigator<F>
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    pub fn new(navigate: F) -> Self {
        Self { navigate }
    }
}

#[async_trait(?Send)]
impl<F> Navigator for RouteNavigator<F>
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    async fn replace(&self, path: &str) -> Result<(), AuthError> {
        (self.navigate)(path, NavigateOptions { replace: true, ..NavigateOptions::default() });
        Ok(())
    }

    async fn push(&self, path: &str) -> Result<(), AuthError> {
        (self.navigate)(path, NavigateOptions::default());
        Ok(())
    }
}

// =============================================================================
// ADDRESS BAR
// =============================================================================

/// The page URL as the browser shows it.
pub trait Location {
    /// Full URL, passed to the identity client when completing a callback.
    fn href(&self) -> String;

    /// Query string including the leading `?`, or empty.
    fn search(&self) -> String {
        search_of(&self.href()).to_owned()
    }

    /// Replace the current history entry with `path` without navigating.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Navigation` if the history API rejects the update.
    fn replace_with(&self, path: &str) -> Result<(), AuthError>;
}

/// Query string of `href` including the leading `?`; empty when there is none.
#[must_use]
pub fn search_of(href: &str) -> &str {
    let without_hash = href.split('#').next().unwrap_or_default();
    without_hash.find('?').map_or("", |at| &without_hash[at..])
}

/// Path of `href` with query string and fragment removed. Absolute URLs lose their origin.
#[must_use]
pub fn bare_path(href: &str) -> &str {
    let rest = match href.find("://") {
        Some(at) => {
            let after_scheme = &href[at + 3..];
            after_scheme.find(['/', '?', '#']).map_or("", |at| &after_scheme[at..])
        }
        None => href,
    };
    let path = rest.split(['?', '#']).next().unwrap_or_default();
    if path.is_empty() { "/" } else { path }
}

/// In-memory [`Location`] for native hosts and tests.
#[derive(Debug, Default)]
pub struct MemoryLocation {
    href: RefCell<String>,
    replaced: RefCell<Vec<String>>,
}

impl MemoryLocation {
    #[must_use]
    pub fn new(href: &str) -> Self {
        Self { href: RefCell::new(href.to_owned()), replaced: RefCell::new(Vec::new()) }
    }

    /// Every path passed to [`Location::replace_with`], oldest first.
    #[must_use]
    pub fn replaced(&self) -> Vec<String> {
        self.replaced.borrow().clone()
    }
}

impl Location for MemoryLocation {
    fn href(&self) -> String {
        self.href.borrow().clone()
    }

    fn replace_with(&self, path: &str) -> Result<(), AuthError> {
        let current = self.href.borrow().clone();
        let origin = current.find("://").map_or("", |at| {
            let after_scheme = &current[at + 3..];
            let end = after_scheme.find(['/', '?', '#']).map_or(current.len(), |i| at + 3 + i);
            &current[..end]
        });
        *self.href.borrow_mut() = format!("{origin}{path}");
        self.replaced.borrow_mut().push(path.to_owned());
        Ok(())
    }
}

/// [`Location`] backed by `window.location` and `window.history`.
#[cfg(feature = "hydrate")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserLocation;

#[cfg(feature = "hydrate")]
impl Location for BrowserLocation {
    fn href(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().href().ok())
            .unwrap_or_default()
    }

    fn search(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default()
    }

    fn replace_with(&self, path: &str) -> Result<(), AuthError> {
        let window = web_sys::window().ok_or_else(|| AuthError::Navigation("no window".into()))?;
        let history = window
            .history()
            .map_err(|e| AuthError::Navigation(format!("{e:?}")))?;
        history
            .replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(path))
            .map_err(|e| AuthError::Navigation(format!("{e:?}")))
    }
}
