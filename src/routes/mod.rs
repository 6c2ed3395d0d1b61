//! Route tables and navigation gating.
//!
//! SYSTEM CONTEXT
//! ==============
//! `RouteTable` is static configuration, `guard` decides a single
//! transition from session state, and `Router` runs the guard before every
//! navigation and tracks the current location.
//!
//! ACCESS CONVENTION
//! =================
//! Every route is protected unless it is declared public. Unknown paths are
//! protected too, so an unauthenticated client can only ever see routes that
//! opted out explicitly.

pub mod guard;
pub mod router;

use std::collections::BTreeMap;

pub use guard::GuardDecision;
pub use router::{Location, Navigation, Navigator, Router};

use crate::config::ClientVariant;

/// Errors raised by route tables and navigation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("no route matches {0}")]
    NotFound(String),
    #[error("invalid route table: {0}")]
    InvalidTable(String),
    #[error("navigation from {from} redirected to {to}, which redirects again")]
    RedirectLoop { from: String, to: String },
}

/// Whether a route needs an authenticated session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Access {
    Public,
    #[default]
    Protected,
}

/// Presentation hints carried alongside a route.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteMeta {
    pub title: Option<String>,
    /// Mobile client only: show the bottom tab bar on this page.
    pub show_tab_bar: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    /// Path pattern; `:name` segments capture a parameter.
    pub path: String,
    pub name: String,
    pub access: Access,
    pub meta: RouteMeta,
    /// Aliases forward to this path before the guard runs.
    pub redirect: Option<String>,
}

impl RouteDescriptor {
    /// A protected route.
    #[must_use]
    pub fn new(path: &str, name: &str) -> Self {
        Self {
            path: path.to_owned(),
            name: name.to_owned(),
            access: Access::Protected,
            meta: RouteMeta::default(),
            redirect: None,
        }
    }

    /// An alias that forwards `path` to `target`.
    #[must_use]
    pub fn alias(path: &str, target: &str) -> Self {
        Self { redirect: Some(target.to_owned()), ..Self::new(path, path) }
    }

    #[must_use]
    pub fn public(mut self) -> Self {
        self.access = Access::Public;
        self
    }

    #[must_use]
    pub fn title(mut self, title: &str) -> Self {
        self.meta.title = Some(title.to_owned());
        self
    }

    #[must_use]
    pub fn tab_bar(mut self) -> Self {
        self.meta.show_tab_bar = true;
        self
    }

    #[must_use]
    pub fn requires_auth(&self) -> bool {
        self.access == Access::Protected
    }

    #[must_use]
    pub fn is_alias(&self) -> bool {
        self.redirect.is_some()
    }

    fn param_count(&self) -> usize {
        segments(&self.path).filter(|s| s.starts_with(':')).count()
    }

    fn match_path(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let mut params = BTreeMap::new();
        let mut pattern = segments(&self.path);
        let mut actual = segments(path);
        loop {
            match (pattern.next(), actual.next()) {
                (None, None) => return Some(params),
                (Some(p), Some(a)) => {
                    if let Some(name) = p.strip_prefix(':') {
                        params.insert(name.to_owned(), a.to_owned());
                    } else if p != a {
                        return None;
                    }
                }
                _ => return None,
            }
        }
    }
}

/// A route plus the parameters captured from the concrete path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub route: &'a RouteDescriptor,
    pub params: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<RouteDescriptor>,
    login_path: String,
    landing_path: String,
}

impl RouteTable {
    /// Build and validate a table.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidTable`] if the table could produce a
    /// redirect cycle or points at missing routes.
    pub fn new(routes: Vec<RouteDescriptor>, login_path: &str, landing_path: &str) -> Result<Self, RouteError> {
        let table = Self::from_parts(routes, login_path, landing_path);
        table.validate()?;
        Ok(table)
    }

    fn from_parts(routes: Vec<RouteDescriptor>, login_path: &str, landing_path: &str) -> Self {
        Self { routes, login_path: normalize_path(login_path), landing_path: normalize_path(landing_path) }
    }

    /// Check the invariants that keep every navigation to one redirect at most.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidTable`] describing the first violation.
    pub fn validate(&self) -> Result<(), RouteError> {
        let invalid = |msg: String| Err(RouteError::InvalidTable(msg));

        for (i, route) in self.routes.iter().enumerate() {
            if !route.path.starts_with('/') {
                return invalid(format!("route path {} must start with '/'", route.path));
            }
            if self.routes[..i].iter().any(|r| r.path == route.path) {
                return invalid(format!("duplicate route path {}", route.path));
            }
            if let Some(target) = &route.redirect {
                match self.resolve(target) {
                    Some(m) if !m.route.is_alias() => {}
                    _ => return invalid(format!("alias {} must point at a concrete route, got {target}", route.path)),
                }
            }
        }

        match self.resolve(&self.login_path) {
            Some(m) if !m.route.is_alias() && !m.route.requires_auth() => {}
            _ => return invalid(format!("login route {} must exist and be public", self.login_path)),
        }
        if self.landing_path == self.login_path {
            return invalid("landing route must differ from the login route".to_owned());
        }
        match self.resolve(&self.landing_path) {
            Some(m) if !m.route.is_alias() && m.route.requires_auth() => {}
            _ => return invalid(format!("landing route {} must exist and be protected", self.landing_path)),
        }
        Ok(())
    }

    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    #[must_use]
    pub fn landing_path(&self) -> &str {
        &self.landing_path
    }

    #[must_use]
    pub fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }

    #[must_use]
    pub fn is_login(&self, path: &str) -> bool {
        normalize_path(path) == self.login_path
    }

    /// Find the route for a concrete path. Static segments win over params.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<RouteMatch<'_>> {
        let path = normalize_path(path);
        self.routes
            .iter()
            .filter_map(|route| route.match_path(&path).map(|params| RouteMatch { route, params }))
            .min_by_key(|m| m.route.param_count())
    }

    /// Look a route up by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&RouteDescriptor> {
        self.routes.iter().find(|r| r.name == name)
    }
}

/// Strip query and fragment, force a leading slash, and drop trailing slashes.
#[must_use]
pub fn normalize_path(raw: &str) -> String {
    let end = raw.find(['?', '#']).unwrap_or(raw.len());
    let trimmed = raw[..end].trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_owned()
    } else if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{trimmed}")
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

// =============================================================================
// BUILT-IN TABLES
// =============================================================================

/// Route table of the desktop admin console.
#[must_use]
pub fn desktop_routes() -> RouteTable {
    RouteTable::from_parts(
        vec![
            RouteDescriptor::new("/login", "Login").public().title("Sign in"),
            RouteDescriptor::alias("/", "/dashboard"),
            RouteDescriptor::new("/dashboard", "Dashboard").title("Dashboard"),
            RouteDescriptor::new("/cars", "CarList").title("Cars"),
            RouteDescriptor::new("/customers", "CustomerList").title("Customers"),
            RouteDescriptor::new("/orders", "OrderList").title("Orders"),
            RouteDescriptor::new("/orders/create", "CreateOrder").title("Create order"),
        ],
        "/login",
        "/dashboard",
    )
}

/// Route table of the mobile app.
#[must_use]
pub fn mobile_routes() -> RouteTable {
    RouteTable::from_parts(
        vec![
            RouteDescriptor::new("/login", "Login").public(),
            RouteDescriptor::alias("/", "/home"),
            RouteDescriptor::new("/home", "Home").tab_bar(),
            RouteDescriptor::new("/car/list", "CarList").tab_bar(),
            RouteDescriptor::new("/car/detail/:id", "CarDetail"),
            RouteDescriptor::new("/customer/list", "CustomerList").tab_bar(),
            RouteDescriptor::new("/customer/detail/:id", "CustomerDetail"),
            RouteDescriptor::new("/order/list", "OrderList").tab_bar(),
            RouteDescriptor::new("/order/detail/:id", "OrderDetail"),
            RouteDescriptor::new("/order/create", "OrderCreate"),
            RouteDescriptor::new("/profile", "Profile").tab_bar(),
        ],
        "/login",
        "/home",
    )
}

#[must_use]
pub fn table_for(variant: ClientVariant) -> RouteTable {
    match variant {
        ClientVariant::Desktop => desktop_routes(),
        ClientVariant::Mobile => mobile_routes(),
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
