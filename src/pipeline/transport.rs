//! Transport seam: one outbound request in, one outcome out.
//!
//! The pipeline never talks to reqwest directly. Tests script outcomes
//! through a mock [`Transport`]; production uses [`ReqwestTransport`].

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::config::Timeouts;

/// HTTP methods used by the backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
            Method::Delete => Self::DELETE,
        }
    }
}

/// A request ready for the wire, credential already decided.
#[derive(Clone, PartialEq)]
pub struct OutboundRequest {
    pub request_id: Uuid,
    pub method: Method,
    /// Path relative to the base URL, starting with `/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Bearer token; `None` sends the request unauthenticated.
    pub bearer: Option<String>,
}

impl OutboundRequest {
    /// The `Authorization` header value this request carries, if any.
    #[must_use]
    pub fn authorization(&self) -> Option<String> {
        self.bearer.as_ref().map(|token| format!("Bearer {token}"))
    }
}

impl fmt::Debug for OutboundRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutboundRequest")
            .field("request_id", &self.request_id)
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("body", &self.body)
            .field("authenticated", &self.bearer.is_some())
            .finish()
    }
}

/// A response as received, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HttpResponse {
    pub status: u16,
    /// Header names lowercased.
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, headers: BTreeMap::new(), body: body.into() }
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.to_owned());
        self
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// What came back from the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportOutcome {
    Response(HttpResponse),
    /// No response at all: connect failure, timeout, broken body stream.
    NoResponse(String),
}

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &OutboundRequest) -> TransportOutcome;
}

// =============================================================================
// REQWEST
// =============================================================================

#[derive(Debug, thiserror::Error)]
#[error("HTTP client build failed: {0}")]
pub struct BuildError(String);

/// Production transport over a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Build a transport against `base_url` (already normalized, no trailing
    /// slash).
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeouts: Timeouts) -> Result<Self, BuildError> {
        let http = reqwest::Client::builder()
            .timeout(timeouts.request())
            .connect_timeout(timeouts.connect())
            .build()
            .map_err(|e| BuildError(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &OutboundRequest) -> TransportOutcome {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.http.request(request.method.into(), url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(error = %e, timeout = e.is_timeout(), connect = e.is_connect(), "no response");
                return TransportOutcome::NoResponse(e.to_string());
            }
        };

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str().to_owned(), v.to_owned())))
            .collect();
        match response.bytes().await {
            Ok(body) => TransportOutcome::Response(HttpResponse { status, headers, body: body.to_vec() }),
            Err(e) => TransportOutcome::NoResponse(format!("response body read failed: {e}")),
        }
    }
}
