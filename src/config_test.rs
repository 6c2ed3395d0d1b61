use super::*;

/// # Safety
/// Env-mutating tests share process state; each one clears every key it reads.
unsafe fn clear_client_env() {
    unsafe {
        std::env::remove_var("CARSALES_API_BASE_URL");
        std::env::remove_var("CARSALES_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("CARSALES_CONNECT_TIMEOUT_SECS");
        std::env::remove_var("CARSALES_SESSION_FILE");
        std::env::remove_var("CARSALES_CLIENT");
    }
}

static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[test]
fn from_env_defaults() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe { clear_client_env() };

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg, ClientConfig::default());
    assert_eq!(cfg.timeouts.request(), Duration::from_secs(30));
}

#[test]
fn from_env_parses_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe {
        clear_client_env();
        std::env::set_var("CARSALES_API_BASE_URL", " https://dealer.example.test/api/ ");
        std::env::set_var("CARSALES_REQUEST_TIMEOUT_SECS", "5");
        std::env::set_var("CARSALES_CONNECT_TIMEOUT_SECS", "2");
        std::env::set_var("CARSALES_SESSION_FILE", "/tmp/carsales-session.json");
        std::env::set_var("CARSALES_CLIENT", "Mobile");
    }

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, "https://dealer.example.test/api");
    assert_eq!(cfg.timeouts, Timeouts { request_secs: 5, connect_secs: 2 });
    assert_eq!(cfg.session_file, PathBuf::from("/tmp/carsales-session.json"));
    assert_eq!(cfg.variant, ClientVariant::Mobile);

    unsafe { clear_client_env() };
}

#[test]
fn from_env_ignores_unparseable_and_zero_timeouts() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe {
        clear_client_env();
        std::env::set_var("CARSALES_REQUEST_TIMEOUT_SECS", "soon");
        std::env::set_var("CARSALES_CONNECT_TIMEOUT_SECS", "0");
    }

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.timeouts, Timeouts::default());

    unsafe { clear_client_env() };
}

#[test]
fn from_env_rejects_unknown_variant() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe {
        clear_client_env();
        std::env::set_var("CARSALES_CLIENT", "tablet");
    }

    let err = ClientConfig::from_env().unwrap_err();
    assert!(err.to_string().contains("tablet"));

    unsafe { clear_client_env() };
}

#[test]
fn normalize_base_url_rejects_blank() {
    assert!(normalize_base_url(" / ").is_err());
    assert_eq!(normalize_base_url("/api/").unwrap(), "/api");
}

#[test]
fn variant_round_trips_through_str() {
    for v in [ClientVariant::Desktop, ClientVariant::Mobile] {
        assert_eq!(ClientVariant::parse(v.as_str()).unwrap(), v);
    }
}
