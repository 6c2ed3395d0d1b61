use super::*;
use crate::storage::MemoryStorage;
use crate::test_helpers::{sample_user, store_with};
use envelope::Role;

fn empty_store() -> (Arc<MemoryStorage>, SessionStore) {
    let storage = Arc::new(MemoryStorage::new());
    let store = SessionStore::load(storage.clone());
    (storage, store)
}

// =============================================================================
// load
// =============================================================================

#[test]
fn load_from_empty_storage_is_unauthenticated() {
    let (_, store) = empty_store();
    assert_eq!(store.token(), "");
    assert!(!store.is_authenticated());
    assert!(store.user_info().is_none());
    assert!(!store.is_admin());
}

#[test]
fn load_restores_token_and_profile() {
    let user = sample_user(Role::Admin);
    let raw = serde_json::to_string(&user).unwrap();
    let storage = Arc::new(MemoryStorage::with_entries([(TOKEN_KEY, "tok-1"), (USER_INFO_KEY, raw.as_str())]));

    let store = SessionStore::load(storage);
    assert_eq!(store.token(), "tok-1");
    assert_eq!(store.user_info(), Some(user));
    assert!(store.is_admin());
}

#[test]
fn load_drops_profile_without_token() {
    let raw = serde_json::to_string(&sample_user(Role::Admin)).unwrap();
    let storage = Arc::new(MemoryStorage::with_entries([(USER_INFO_KEY, raw.as_str())]));

    let store = SessionStore::load(storage);
    assert!(store.user_info().is_none());
    assert!(!store.is_admin());
}

#[test]
fn load_drops_unreadable_profile_but_keeps_token() {
    let storage = Arc::new(MemoryStorage::with_entries([(TOKEN_KEY, "tok-1"), (USER_INFO_KEY, "{not json")]));

    let store = SessionStore::load(storage);
    assert_eq!(store.token(), "tok-1");
    assert!(store.user_info().is_none());
}

// =============================================================================
// setters
// =============================================================================

#[test]
fn set_token_writes_through() {
    let (storage, store) = empty_store();
    store.set_token("tok-2");
    assert_eq!(store.token(), "tok-2");
    assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("tok-2"));
}

#[test]
fn set_token_does_not_validate_structure() {
    let (_, store) = empty_store();
    store.set_token("not.a.jwt but fine");
    assert_eq!(store.token(), "not.a.jwt but fine");
}

#[test]
fn set_user_info_writes_through_as_json() {
    let (storage, store) = empty_store();
    store.set_token("tok");
    store.set_user_info(sample_user(Role::Salesperson));

    let raw = storage.get(USER_INFO_KEY).unwrap().unwrap();
    let persisted: User = serde_json::from_str(&raw).unwrap();
    assert_eq!(persisted.role, Role::Salesperson);
    assert!(!store.is_admin());
}

#[test]
fn set_user_info_without_token_is_ignored() {
    let (storage, store) = empty_store();
    store.set_user_info(sample_user(Role::Admin));
    assert!(store.user_info().is_none());
    assert!(!storage.contains(USER_INFO_KEY));
}

#[test]
fn new_process_observes_state_written_by_previous_one() {
    let storage = Arc::new(MemoryStorage::new());
    {
        let first = SessionStore::load(storage.clone());
        first.set_token("tok-3");
        first.set_user_info(sample_user(Role::Admin));
    }
    let second = SessionStore::load(storage);
    assert_eq!(second.token(), "tok-3");
    assert!(second.is_admin());
}

#[test]
fn set_empty_token_logs_out() {
    let (storage, store) = store_with("tok", Some(sample_user(Role::Admin)));
    store.set_token("");
    assert!(!store.is_authenticated());
    assert!(store.user_info().is_none());
    assert!(!storage.contains(TOKEN_KEY));
    assert!(!storage.contains(USER_INFO_KEY));
}

// =============================================================================
// logout
// =============================================================================

#[test]
fn logout_clears_memory_and_storage() {
    let (storage, store) = store_with("tok", Some(sample_user(Role::Admin)));
    assert!(store.logout());
    assert_eq!(store.snapshot(), Session::default());
    assert!(!storage.contains(TOKEN_KEY));
    assert!(!storage.contains(USER_INFO_KEY));
}

#[test]
fn logout_twice_is_a_no_op_the_second_time() {
    let (storage, store) = store_with("tok", Some(sample_user(Role::Admin)));
    assert!(store.logout());
    assert!(!store.logout());
    assert_eq!(store.snapshot(), Session::default());
    assert!(!storage.contains(TOKEN_KEY));
    assert!(!storage.contains(USER_INFO_KEY));
}

#[test]
fn logout_when_never_logged_in_is_safe() {
    let (_, store) = empty_store();
    assert!(!store.logout());
}

#[test]
fn concurrent_logout_and_set_token_never_leave_profile_without_token() {
    let (_, store) = store_with("tok", Some(sample_user(Role::Admin)));
    let store = Arc::new(store);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = store.clone();
            std::thread::spawn(move || {
                if i % 2 == 0 {
                    store.logout();
                } else {
                    store.set_token(format!("tok-{i}"));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let snap = store.snapshot();
    assert!(snap.profile.is_none() || snap.is_authenticated());
}

#[test]
fn debug_output_omits_token() {
    let (_, store) = store_with("secret-token", None);
    let rendered = format!("{store:?}");
    assert!(!rendered.contains("secret-token"));
    assert!(rendered.contains("authenticated: true"));
}
