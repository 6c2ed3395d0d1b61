//! Request pipeline shared by every backend call.
//!
//! SYSTEM CONTEXT
//! ==============
//! ```text
//! ApiRequest ──► attach credential ──► Transport ──► classify ──► settle ──► Result
//!                 (SessionStore)                     (pure)      (Notifier,
//!                                                                 SessionStore,
//!                                                                 Navigator)
//! ```
//!
//! DESIGN
//! ======
//! Every call ends in exactly one of: success, raw success, failure, or
//! cancellation. Each failure notifies the user once. An authentication
//! failure also clears the session and redirects to login before the `Err`
//! reaches the caller. Cancellation is silent and leaves the session alone.
//!
//! Nothing is retried.

pub mod classify;
pub mod error;
pub mod request;
pub mod transport;

use std::future::Future;
use std::sync::Arc;

use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

pub use error::{ApiError, ErrorKind};
pub use request::{ApiRequest, query_pairs};
pub use transport::{HttpResponse, Method, OutboundRequest, ReqwestTransport, Transport, TransportOutcome};

use crate::notify::Notifier;
use crate::routes::Navigator;
use crate::session::SessionStore;

/// A successful download, envelope untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    /// From `Content-Disposition`, when the backend names the file.
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
}

impl From<HttpResponse> for RawResponse {
    fn from(response: HttpResponse) -> Self {
        Self {
            status: response.status,
            content_type: response.header("content-type").map(ToOwned::to_owned),
            filename: response.header("content-disposition").and_then(disposition_filename),
            bytes: response.body,
        }
    }
}

pub struct Pipeline {
    session: Arc<SessionStore>,
    transport: Arc<dyn Transport>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl Pipeline {
    #[must_use]
    pub fn new(
        session: Arc<SessionStore>,
        transport: Arc<dyn Transport>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self { session, transport, notifier, navigator }
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Run an envelope call and decode `data` into `T`.
    ///
    /// # Errors
    ///
    /// Any classified failure, or [`ApiError::InvalidResponse`] when `data`
    /// does not match `T`. Already notified when returned.
    pub async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let value = self.send(request).await?;
        envelope::decode_value(value).map_err(|e| self.settle(ApiError::InvalidResponse(e.to_string())))
    }

    /// Run an envelope call and return `data` as JSON.
    ///
    /// # Errors
    ///
    /// Any classified failure. Already notified when returned.
    pub async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        self.execute(request, classify::classify_envelope).await
    }

    /// Run a file download; a 2xx body is returned without envelope checks.
    ///
    /// # Errors
    ///
    /// Any non-2xx status or missing response. Already notified when returned.
    pub async fn download(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        self.execute(request, classify::classify_raw).await.map(RawResponse::from)
    }

    /// [`Pipeline::call`], abandoned as soon as `cancel` resolves.
    ///
    /// # Errors
    ///
    /// [`ApiError::Cancelled`] on cancellation, without notification or
    /// session changes; otherwise as [`Pipeline::call`].
    pub async fn call_cancellable<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        cancel: impl Future<Output = ()>,
    ) -> Result<T, ApiError> {
        tokio::select! {
            biased;
            () = cancel => Err(cancelled()),
            result = self.call(request) => result,
        }
    }

    /// [`Pipeline::send`], abandoned as soon as `cancel` resolves.
    ///
    /// # Errors
    ///
    /// As [`Pipeline::call_cancellable`].
    pub async fn send_cancellable(
        &self,
        request: ApiRequest,
        cancel: impl Future<Output = ()>,
    ) -> Result<Value, ApiError> {
        tokio::select! {
            biased;
            () = cancel => Err(cancelled()),
            result = self.send(request) => result,
        }
    }

    async fn execute<T>(
        &self,
        request: ApiRequest,
        classify: fn(TransportOutcome) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let request_id = Uuid::new_v4();
        let span = info_span!("api_request", %request_id, method = request.method.as_str(), path = %request.path);

        async move {
            if let Some(detail) = request.encode_error() {
                return Err(self.settle(ApiError::Encode(detail.to_owned())));
            }

            let outbound = self.outbound(request, request_id);
            debug!(authenticated = outbound.bearer.is_some(), "sending");
            let outcome = self.transport.send(&outbound).await;
            classify(outcome).map_err(|e| self.settle(e))
        }
        .instrument(span)
        .await
    }

    fn outbound(&self, request: ApiRequest, request_id: Uuid) -> OutboundRequest {
        let token = self.session.token();
        OutboundRequest {
            request_id,
            method: request.method,
            path: request.path,
            query: request.query,
            body: request.body,
            bearer: (!token.is_empty()).then_some(token),
        }
    }

    /// Apply the side effects of a failure and hand it back.
    fn settle(&self, error: ApiError) -> ApiError {
        warn!(code = error.error_code(), error = %error, "request failed");
        if let Some(message) = error.notification() {
            self.notifier.error(message);
        }
        if error.kind() == ErrorKind::Authentication {
            let cleared = self.session.logout();
            self.navigator.redirect_to_login();
            info!(cleared, "credential rejected by backend");
        }
        error
    }
}

fn cancelled() -> ApiError {
    debug!("request cancelled");
    ApiError::Cancelled
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline").field("session", &self.session).finish_non_exhaustive()
    }
}

/// Pull a filename out of a `Content-Disposition` value. Prefers the RFC 5987
/// `filename*` form. Only the final path component is kept, so the name is
/// always safe to join onto a local directory.
fn disposition_filename(value: &str) -> Option<String> {
    let params: Vec<(&str, &str)> = value
        .split(';')
        .filter_map(|part| part.split_once('='))
        .map(|(k, v)| (k.trim(), v.trim()))
        .collect();

    let extended = params
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("filename*"))
        .and_then(|(_, v)| v.split_once("''"))
        .map(|(_, encoded)| percent_decode_str(encoded).decode_utf8_lossy().into_owned());
    let plain = || {
        params
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("filename"))
            .map(|(_, v)| v.trim_matches('"').to_owned())
    };
    extended.or_else(plain).and_then(|name| last_component(&name))
}

/// Final `/` or `\` separated segment of `name`; `None` when nothing usable
/// is left.
fn last_component(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    match base {
        "" | "." | ".." => None,
        _ => Some(base.to_owned()),
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
