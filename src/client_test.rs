use super::*;
use crate::session::{TOKEN_KEY, USER_INFO_KEY};
use crate::storage::MemoryStorage;
use crate::test_helpers::{MockTransport, RecordingNotifier, envelope_reply, ok_reply, sample_user, status_reply};
use envelope::Role;
use serde_json::{Value, json};

struct Fixture {
    storage: Arc<MemoryStorage>,
    transport: Arc<MockTransport>,
    notifier: Arc<RecordingNotifier>,
    client: DealerClient,
}

fn fixture(variant: ClientVariant, storage: MemoryStorage, outcomes: Vec<crate::pipeline::TransportOutcome>) -> Fixture {
    let storage = Arc::new(storage);
    let transport = Arc::new(MockTransport::new(outcomes));
    let notifier = Arc::new(RecordingNotifier::default());
    let client = DealerClient::new(variant, storage.clone(), transport.clone(), notifier.clone());
    Fixture { storage, transport, notifier, client }
}

fn login_payload() -> Value {
    json!({
        "token": "jwt-1",
        "userInfo": {"id": "1", "username": "admin", "realName": "Administrator", "role": "ADMIN"}
    })
}

fn persisted_session() -> MemoryStorage {
    let raw = serde_json::to_string(&sample_user(Role::Salesperson)).unwrap();
    MemoryStorage::with_entries([(TOKEN_KEY, "jwt-old"), (USER_INFO_KEY, raw.as_str())])
}

#[tokio::test]
async fn login_stores_session_and_enters_landing() {
    let f = fixture(ClientVariant::Desktop, MemoryStorage::new(), vec![ok_reply(login_payload())]);
    let nav = f.client.login("admin", "admin123").await.unwrap();

    assert_eq!(nav.location.path, "/dashboard");
    assert_eq!(f.client.session().token(), "jwt-1");
    assert!(f.client.session().is_admin());
    assert_eq!(f.storage.get(TOKEN_KEY).unwrap().as_deref(), Some("jwt-1"));
    assert!(f.transport.last().bearer.is_none());
}

#[tokio::test]
async fn mobile_login_enters_home() {
    let f = fixture(ClientVariant::Mobile, MemoryStorage::new(), vec![ok_reply(login_payload())]);
    assert_eq!(f.client.login("admin", "admin123").await.unwrap().location.path, "/home");
}

#[tokio::test]
async fn failed_login_leaves_session_empty() {
    let f = fixture(
        ClientVariant::Desktop,
        MemoryStorage::new(),
        vec![envelope_reply(1001, "Wrong username or password", Value::Null)],
    );
    let err = f.client.login("admin", "bad").await.unwrap_err();

    assert!(matches!(err, ClientError::Api(ApiError::Application { code: 1001, .. })));
    assert!(!f.client.session().is_authenticated());
    assert_eq!(f.notifier.messages(), ["Wrong username or password"]);
}

#[tokio::test]
async fn session_survives_restart() {
    let f = fixture(ClientVariant::Desktop, persisted_session(), vec![]);
    assert_eq!(f.client.session().token(), "jwt-old");
    assert_eq!(f.client.navigate("/orders").unwrap().location.path, "/orders");
}

#[tokio::test]
async fn logout_tells_backend_then_clears_and_enters_login() {
    let f = fixture(ClientVariant::Desktop, persisted_session(), vec![ok_reply(Value::Null)]);
    let nav = f.client.logout().await.unwrap();

    assert_eq!(nav.location.path, "/login");
    assert!(!f.storage.contains(TOKEN_KEY));
    assert!(!f.storage.contains(USER_INFO_KEY));
    let sent = f.transport.last();
    assert_eq!(sent.path, "/auth/logout");
    assert_eq!(sent.bearer.as_deref(), Some("jwt-old"));
}

#[tokio::test]
async fn logout_clears_session_even_if_backend_unreachable() {
    let f = fixture(
        ClientVariant::Mobile,
        persisted_session(),
        vec![crate::pipeline::TransportOutcome::NoResponse("refused".into())],
    );
    f.client.logout().await.unwrap();
    assert!(!f.client.session().is_authenticated());
}

#[tokio::test]
async fn logout_without_session_skips_backend() {
    let f = fixture(ClientVariant::Desktop, MemoryStorage::new(), vec![]);
    f.client.logout().await.unwrap();
    assert!(f.transport.sent().is_empty());
}

#[tokio::test]
async fn refresh_profile_updates_session() {
    let f = fixture(ClientVariant::Desktop, persisted_session(), vec![ok_reply(login_payload())]);
    let user = f.client.refresh_profile().await.unwrap();

    assert_eq!(user.username, "admin");
    assert!(f.client.session().is_admin());
}

#[tokio::test]
async fn expired_token_during_page_load_returns_to_login() {
    let f = fixture(ClientVariant::Mobile, persisted_session(), vec![status_reply(401, "")]);
    f.client.navigate("/order/list").unwrap();

    f.client.refresh_profile().await.unwrap_err();
    assert!(!f.client.session().is_authenticated());
    assert_eq!(f.client.router().current().unwrap().path, "/login");
    assert_eq!(f.client.navigate("/order/list").unwrap().location.path, "/login");
}
