//! Shared fixtures for unit tests: seeded sessions, recording sinks and a
//! scripted transport.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use envelope::{Envelope, Role, User};
use serde_json::Value;

use crate::notify::Notifier;
use crate::pipeline::{HttpResponse, OutboundRequest, Pipeline, Transport, TransportOutcome};
use crate::routes::Navigator;
use crate::session::SessionStore;
use crate::storage::MemoryStorage;

#[must_use]
pub fn sample_user(role: Role) -> User {
    User {
        id: 7,
        username: "zhang.wei".into(),
        real_name: "Zhang Wei".into(),
        role,
        phone: Some("13800000000".into()),
        email: None,
    }
}

/// A store backed by memory storage and seeded through the public setters.
#[must_use]
pub fn store_with(token: &str, profile: Option<User>) -> (Arc<MemoryStorage>, SessionStore) {
    let storage = Arc::new(MemoryStorage::new());
    let store = SessionStore::load(storage.clone());
    if !token.is_empty() {
        store.set_token(token);
    }
    if let Some(user) = profile {
        store.set_user_info(user);
    }
    (storage, store)
}

// =============================================================================
// RECORDING SINKS
// =============================================================================

#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_owned());
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    redirects: AtomicUsize,
}

impl RecordingNavigator {
    pub fn redirects(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }
}

impl Navigator for RecordingNavigator {
    fn redirect_to_login(&self) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
    }
}

// =============================================================================
// MOCK TRANSPORT
// =============================================================================

/// Replays scripted outcomes in order and records every request it sees.
pub struct MockTransport {
    outcomes: Mutex<VecDeque<TransportOutcome>>,
    sent: Mutex<Vec<OutboundRequest>>,
    delay: Option<Duration>,
}

impl MockTransport {
    pub fn new(outcomes: Vec<TransportOutcome>) -> Self {
        Self { outcomes: Mutex::new(outcomes.into()), sent: Mutex::new(Vec::new()), delay: None }
    }

    pub fn replying(outcome: TransportOutcome) -> Self {
        Self::new(vec![outcome])
    }

    /// Hold every response for `delay` before returning it.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn sent(&self) -> Vec<OutboundRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last(&self) -> OutboundRequest {
        self.sent().pop().expect("no request sent")
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &OutboundRequest) -> TransportOutcome {
        self.sent.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.outcomes.lock().unwrap().pop_front();
        next.unwrap_or_else(|| TransportOutcome::NoResponse("no scripted response".into()))
    }
}

/// 200 carrying an envelope.
pub fn envelope_reply(code: i64, message: &str, data: Value) -> TransportOutcome {
    let envelope = Envelope { data, ..Envelope::error(code, message) };
    TransportOutcome::Response(HttpResponse::new(200, serde_json::to_vec(&envelope).unwrap()))
}

pub fn ok_reply(data: Value) -> TransportOutcome {
    envelope_reply(0, "success", data)
}

pub fn status_reply(status: u16, body: &str) -> TransportOutcome {
    TransportOutcome::Response(HttpResponse::new(status, body.as_bytes().to_vec()))
}

// =============================================================================
// PIPELINE HARNESS
// =============================================================================

/// A pipeline wired to recording collaborators.
pub struct Harness {
    pub storage: Arc<MemoryStorage>,
    pub session: Arc<SessionStore>,
    pub transport: Arc<MockTransport>,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<RecordingNavigator>,
    pub pipeline: Pipeline,
}

impl Harness {
    pub fn new(token: &str, transport: MockTransport) -> Self {
        let profile = (!token.is_empty()).then(|| sample_user(Role::Admin));
        let (storage, store) = store_with(token, profile);
        let session = Arc::new(store);
        let transport = Arc::new(transport);
        let notifier = Arc::new(RecordingNotifier::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let pipeline = Pipeline::new(session.clone(), transport.clone(), notifier.clone(), navigator.clone());
        Self { storage, session, transport, notifier, navigator, pipeline }
    }
}
