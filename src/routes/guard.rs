//! Navigation guard: the single decision run before every route change.
//!
//! Pure function of the route table, the target path and whether a token is
//! present. The router owns the side effects.

use super::RouteTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// Navigate here instead of the requested target.
    Redirect(String),
}

/// Decide whether `path` may be entered.
///
/// 1. protected target without a token redirects to the login route;
/// 2. the login route with a token redirects to the landing route;
/// 3. anything else is allowed.
///
/// Unknown paths count as protected.
#[must_use]
pub fn check(table: &RouteTable, path: &str, authenticated: bool) -> GuardDecision {
    let requires_auth = table.resolve(path).is_none_or(|m| m.route.requires_auth());

    if requires_auth && !authenticated {
        return GuardDecision::Redirect(table.login_path().to_owned());
    }
    if authenticated && table.is_login(path) {
        return GuardDecision::Redirect(table.landing_path().to_owned());
    }
    GuardDecision::Allow
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
