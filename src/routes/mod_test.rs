use super::*;

// =============================================================================
// normalize_path
// =============================================================================

#[test]
fn normalize_strips_query_fragment_and_trailing_slash() {
    assert_eq!(normalize_path("/cars/?page=2"), "/cars");
    assert_eq!(normalize_path("/orders#top"), "/orders");
    assert_eq!(normalize_path("dashboard"), "/dashboard");
    assert_eq!(normalize_path(""), "/");
    assert_eq!(normalize_path("///"), "/");
}

// =============================================================================
// resolve
// =============================================================================

#[test]
fn resolve_static_route() {
    let table = desktop_routes();
    let m = table.resolve("/orders/create").unwrap();
    assert_eq!(m.route.name, "CreateOrder");
    assert!(m.params.is_empty());
}

#[test]
fn resolve_captures_params() {
    let table = mobile_routes();
    let m = table.resolve("/car/detail/42").unwrap();
    assert_eq!(m.route.name, "CarDetail");
    assert_eq!(m.params.get("id").map(String::as_str), Some("42"));
}

#[test]
fn resolve_prefers_static_over_param_segment() {
    let table = RouteTable::new(
        vec![
            RouteDescriptor::new("/login", "Login").public(),
            RouteDescriptor::new("/order/:id", "OrderDetail"),
            RouteDescriptor::new("/order/create", "OrderCreate"),
        ],
        "/login",
        "/order/create",
    )
    .unwrap();
    assert_eq!(table.resolve("/order/create").unwrap().route.name, "OrderCreate");
    assert_eq!(table.resolve("/order/7").unwrap().route.name, "OrderDetail");
}

#[test]
fn resolve_unknown_path_is_none() {
    assert!(desktop_routes().resolve("/nowhere").is_none());
    assert!(mobile_routes().resolve("/car/detail").is_none());
}

#[test]
fn by_name_finds_route() {
    let table = mobile_routes();
    assert_eq!(table.by_name("Profile").unwrap().path, "/profile");
    assert!(table.by_name("Missing").is_none());
}

// =============================================================================
// descriptors
// =============================================================================

#[test]
fn descriptors_are_protected_unless_public() {
    assert!(RouteDescriptor::new("/x", "X").requires_auth());
    assert!(!RouteDescriptor::new("/x", "X").public().requires_auth());
}

#[test]
fn only_login_is_public_in_builtin_tables() {
    for table in [desktop_routes(), mobile_routes()] {
        let public: Vec<_> = table.routes().iter().filter(|r| !r.requires_auth()).map(|r| r.path.as_str()).collect();
        assert_eq!(public, ["/login"]);
    }
}

#[test]
fn mobile_tab_bar_routes() {
    let table = mobile_routes();
    let tabs: Vec<_> = table.routes().iter().filter(|r| r.meta.show_tab_bar).map(|r| r.name.as_str()).collect();
    assert_eq!(tabs, ["Home", "CarList", "CustomerList", "OrderList", "Profile"]);
}

#[test]
fn desktop_routes_carry_titles() {
    let table = desktop_routes();
    assert_eq!(table.resolve("/cars").unwrap().route.meta.title.as_deref(), Some("Cars"));
}

// =============================================================================
// validation
// =============================================================================

#[test]
fn builtin_tables_validate() {
    desktop_routes().validate().unwrap();
    mobile_routes().validate().unwrap();
}

#[test]
fn table_for_variant() {
    assert_eq!(table_for(ClientVariant::Desktop).landing_path(), "/dashboard");
    assert_eq!(table_for(ClientVariant::Mobile).landing_path(), "/home");
}

#[test]
fn protected_login_route_is_rejected() {
    let err = RouteTable::new(
        vec![RouteDescriptor::new("/login", "Login"), RouteDescriptor::new("/home", "Home")],
        "/login",
        "/home",
    )
    .unwrap_err();
    assert!(matches!(err, RouteError::InvalidTable(_)));
}

#[test]
fn public_landing_route_is_rejected() {
    let err = RouteTable::new(
        vec![RouteDescriptor::new("/login", "Login").public(), RouteDescriptor::new("/home", "Home").public()],
        "/login",
        "/home",
    )
    .unwrap_err();
    assert!(matches!(err, RouteError::InvalidTable(_)));
}

#[test]
fn landing_equal_to_login_is_rejected() {
    let err = RouteTable::new(vec![RouteDescriptor::new("/login", "Login").public()], "/login", "/login").unwrap_err();
    assert!(matches!(err, RouteError::InvalidTable(_)));
}

#[test]
fn alias_to_alias_is_rejected() {
    let err = RouteTable::new(
        vec![
            RouteDescriptor::new("/login", "Login").public(),
            RouteDescriptor::new("/home", "Home"),
            RouteDescriptor::alias("/", "/start"),
            RouteDescriptor::alias("/start", "/home"),
        ],
        "/login",
        "/home",
    )
    .unwrap_err();
    assert!(matches!(err, RouteError::InvalidTable(_)));
}

#[test]
fn duplicate_paths_are_rejected() {
    let err = RouteTable::new(
        vec![
            RouteDescriptor::new("/login", "Login").public(),
            RouteDescriptor::new("/home", "Home"),
            RouteDescriptor::new("/home", "Home2"),
        ],
        "/login",
        "/home",
    )
    .unwrap_err();
    assert!(matches!(err, RouteError::InvalidTable(_)));
}

#[test]
fn relative_route_path_is_rejected() {
    let err = RouteTable::new(
        vec![RouteDescriptor::new("/login", "Login").public(), RouteDescriptor::new("home", "Home")],
        "/login",
        "/home",
    )
    .unwrap_err();
    assert!(matches!(err, RouteError::InvalidTable(_)));
}
