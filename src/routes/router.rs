//! Router: runs the guard before each transition and tracks the location.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info, warn};

use super::guard::{self, GuardDecision};
use super::{RouteError, RouteTable, normalize_path};
use crate::session::SessionStore;

/// Sink for the pipeline's "go to login" side effect.
pub trait Navigator: Send + Sync {
    /// Move to the login route. Calling it while already there does nothing.
    fn redirect_to_login(&self);
}

/// Where the client currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub name: String,
    pub params: BTreeMap<String, String>,
}

/// Outcome of a successful [`Router::navigate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// The path the caller asked for, as given.
    pub requested: String,
    /// The route actually entered.
    pub location: Location,
    /// Set when the guard sent the client elsewhere; holds the blocked path.
    pub redirected_from: Option<String>,
}

impl Navigation {
    #[must_use]
    pub fn was_redirected(&self) -> bool {
        self.redirected_from.is_some()
    }
}

pub struct Router {
    table: RouteTable,
    session: Arc<SessionStore>,
    location: Mutex<Option<Location>>,
}

impl Router {
    #[must_use]
    pub fn new(table: RouteTable, session: Arc<SessionStore>) -> Self {
        Self { table, session, location: Mutex::new(None) }
    }

    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// The last location entered, if any navigation has happened yet.
    #[must_use]
    pub fn current(&self) -> Option<Location> {
        self.location.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Navigate to `path`, applying aliases and the guard.
    ///
    /// A guard redirect replaces the target, so the caller only ever sees
    /// (and loads) the route that was actually entered.
    ///
    /// # Errors
    ///
    /// - [`RouteError::NotFound`] for an unknown path while authenticated.
    /// - [`RouteError::RedirectLoop`] if the redirect target is itself
    ///   redirected, which a validated table never produces.
    pub fn navigate(&self, path: &str) -> Result<Navigation, RouteError> {
        let mut slot = self.location.lock().unwrap_or_else(PoisonError::into_inner);
        self.navigate_locked(&mut slot, path)
    }

    fn navigate_locked(&self, slot: &mut Option<Location>, path: &str) -> Result<Navigation, RouteError> {
        let target = self.follow_alias(&normalize_path(path));
        let authenticated = self.session.is_authenticated();

        let (entered, redirected_from) = match guard::check(&self.table, &target, authenticated) {
            GuardDecision::Allow => (target, None),
            GuardDecision::Redirect(to) => {
                if guard::check(&self.table, &to, authenticated) != GuardDecision::Allow {
                    warn!(from = %target, to = %to, "guard redirect target is itself guarded");
                    return Err(RouteError::RedirectLoop { from: target, to });
                }
                debug!(from = %target, to = %to, authenticated, "navigation redirected by guard");
                (to, Some(target))
            }
        };

        let matched = self.table.resolve(&entered).ok_or_else(|| RouteError::NotFound(entered.clone()))?;
        let location = Location { path: entered.clone(), name: matched.route.name.clone(), params: matched.params };

        *slot = Some(location.clone());
        debug!(path = %location.path, route = %location.name, "navigated");

        Ok(Navigation { requested: path.to_owned(), location, redirected_from })
    }

    fn follow_alias(&self, path: &str) -> String {
        match self.table.resolve(path).and_then(|m| m.route.redirect.clone()) {
            Some(target) => normalize_path(&target),
            None => path.to_owned(),
        }
    }
}

impl Navigator for Router {
    fn redirect_to_login(&self) {
        let mut slot = self.location.lock().unwrap_or_else(PoisonError::into_inner);
        let login = self.table.login_path().to_owned();
        if slot.as_ref().is_some_and(|loc| loc.path == login) {
            return;
        }
        match self.navigate_locked(&mut slot, &login) {
            Ok(nav) => info!(path = %nav.location.path, "redirected to login"),
            Err(e) => warn!(error = %e, "redirect to login failed"),
        }
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("login", &self.table.login_path())
            .field("landing", &self.table.landing_path())
            .field("current", &self.current())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "router_test.rs"]
mod tests;
