use super::*;
use crate::routes::{RouteDescriptor, desktop_routes, mobile_routes};
use crate::test_helpers::{sample_user, store_with};
use envelope::Role;

fn router(token: &str, table: RouteTable) -> (Arc<SessionStore>, Router) {
    let (_, store) = store_with(token, None);
    let session = Arc::new(store);
    (session.clone(), Router::new(table, session))
}

/// Navigate and run the page loader of whatever route was entered.
fn visit(router: &Router, path: &str, loaded: &mut Vec<String>) -> Navigation {
    let nav = router.navigate(path).unwrap();
    loaded.push(nav.location.name.clone());
    nav
}

// =============================================================================
// navigate
// =============================================================================

#[test]
fn protected_target_without_token_lands_on_login_and_is_never_loaded() {
    let (_, router) = router("", desktop_routes());
    let mut loaded = Vec::new();

    let nav = visit(&router, "/orders", &mut loaded);
    assert_eq!(nav.location.path, "/login");
    assert_eq!(nav.redirected_from.as_deref(), Some("/orders"));
    assert_eq!(loaded, ["Login"]);
}

#[test]
fn login_with_token_lands_on_dashboard() {
    let (_, router) = router("tok", desktop_routes());
    let nav = router.navigate("/login").unwrap();
    assert_eq!(nav.location.path, "/dashboard");
    assert!(nav.was_redirected());
}

#[test]
fn allowed_navigation_is_not_redirected() {
    let (_, router) = router("tok", desktop_routes());
    let nav = router.navigate("/cars").unwrap();
    assert_eq!(nav.location.name, "CarList");
    assert!(!nav.was_redirected());
    assert_eq!(nav.requested, "/cars");
}

#[test]
fn root_alias_resolves_to_landing() {
    let (_, router) = router("tok", mobile_routes());
    let nav = router.navigate("/").unwrap();
    assert_eq!(nav.location.path, "/home");
    assert!(!nav.was_redirected());
}

#[test]
fn root_alias_without_token_redirects_once_to_login() {
    let (_, router) = router("", desktop_routes());
    let nav = router.navigate("/").unwrap();
    assert_eq!(nav.location.path, "/login");
    assert_eq!(nav.redirected_from.as_deref(), Some("/dashboard"));
}

#[test]
fn params_are_returned_with_navigation() {
    let (_, router) = router("tok", mobile_routes());
    let nav = router.navigate("/customer/detail/17?tab=orders").unwrap();
    assert_eq!(nav.location.name, "CustomerDetail");
    assert_eq!(nav.location.params.get("id").map(String::as_str), Some("17"));
}

#[test]
fn unknown_path_with_token_is_not_found() {
    let (_, router) = router("tok", desktop_routes());
    let err = router.navigate("/nowhere").unwrap_err();
    assert_eq!(err, RouteError::NotFound("/nowhere".into()));
    assert!(router.current().is_none());
}

#[test]
fn unknown_path_without_token_goes_to_login() {
    let (_, router) = router("", desktop_routes());
    assert_eq!(router.navigate("/nowhere").unwrap().location.path, "/login");
}

#[test]
fn guard_reads_session_at_navigation_time() {
    let (session, router) = router("", desktop_routes());
    assert_eq!(router.navigate("/cars").unwrap().location.path, "/login");

    session.set_token("tok");
    session.set_user_info(sample_user(Role::Salesperson));
    assert_eq!(router.navigate("/cars").unwrap().location.path, "/cars");

    session.logout();
    assert_eq!(router.navigate("/cars").unwrap().location.path, "/login");
}

#[test]
fn current_tracks_last_entered_route() {
    let (_, router) = router("tok", desktop_routes());
    assert!(router.current().is_none());
    router.navigate("/customers").unwrap();
    assert_eq!(router.current().unwrap().name, "CustomerList");
}

#[test]
fn unvalidated_table_reports_redirect_loop() {
    // Both login and landing protected: the login redirect is guarded again.
    let table = RouteTable::from_parts(
        vec![RouteDescriptor::new("/login", "Login"), RouteDescriptor::new("/home", "Home")],
        "/login",
        "/home",
    );
    let (_, router) = router("", table);
    let err = router.navigate("/home").unwrap_err();
    assert!(matches!(err, RouteError::RedirectLoop { .. }));
}

// =============================================================================
// Navigator
// =============================================================================

#[test]
fn redirect_to_login_moves_to_login() {
    let (session, router) = router("tok", desktop_routes());
    router.navigate("/orders").unwrap();

    session.logout();
    router.redirect_to_login();
    assert_eq!(router.current().unwrap().path, "/login");
}

#[test]
fn redirect_to_login_when_already_there_is_a_no_op() {
    let (_, router) = router("", desktop_routes());
    router.navigate("/login").unwrap();
    router.redirect_to_login();
    assert_eq!(router.current().unwrap().path, "/login");
}

#[test]
fn concurrent_redirects_to_login_settle_on_login() {
    let (session, router) = router("tok", mobile_routes());
    router.navigate("/order/detail/9").unwrap();
    session.logout();

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| router.redirect_to_login());
        }
    });

    let current = router.current().unwrap();
    assert_eq!(current.path, "/login");
    assert!(current.params.is_empty());
}

#[test]
fn redirect_to_login_with_live_session_lands_on_landing() {
    // Guard still applies: a live session is sent on to the landing route.
    let (_, router) = router("tok", mobile_routes());
    router.redirect_to_login();
    assert_eq!(router.current().unwrap().path, "/home");
}
