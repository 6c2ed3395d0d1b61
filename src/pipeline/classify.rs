//! Pure response classification.
//!
//! Maps a [`TransportOutcome`] to exactly one result. No side effects here:
//! notification, logout and redirect are applied afterwards by the pipeline
//! based on the [`ApiError`] this returns.
//!
//! AUTH FAILURE SOURCES
//! ====================
//! Credential failure arrives two ways: HTTP 401, or a 2xx envelope with
//! code 1002. Status is examined first and a non-2xx response never has its
//! envelope interpreted, so a 401 whose body also says 1002 yields a single
//! `Authentication` error.

use envelope::{Envelope, body_message};
use serde_json::Value;

use super::error::{ApiError, MSG_FORBIDDEN, MSG_NOT_FOUND, MSG_REQUEST_FAILED, MSG_SERVER_ERROR, MSG_UNAUTHORIZED};
use super::transport::{HttpResponse, TransportOutcome};

/// Classify a call whose 2xx body is an envelope. Returns the envelope
/// `data` on success.
///
/// # Errors
///
/// Every non-success outcome maps to one [`ApiError`].
pub fn classify_envelope(outcome: TransportOutcome) -> Result<Value, ApiError> {
    let response = responded(outcome)?;
    if !response.is_success() {
        return Err(classify_status(&response));
    }

    let envelope = Envelope::parse(&response.body)
        .map_err(|e| ApiError::Malformed { status: response.status, detail: e.to_string() })?;
    if envelope.is_success() {
        return Ok(envelope.data);
    }

    let token_invalid = envelope.is_token_invalid();
    let message = or_request_failed(Some(envelope.message));
    if token_invalid {
        Err(ApiError::Authentication { message })
    } else {
        Err(ApiError::Application { code: envelope.code, message })
    }
}

/// Classify a raw download. A 2xx body is returned untouched, even if it
/// happens to look like an error envelope.
///
/// # Errors
///
/// Non-2xx statuses and missing responses map to one [`ApiError`].
pub fn classify_raw(outcome: TransportOutcome) -> Result<HttpResponse, ApiError> {
    let response = responded(outcome)?;
    if response.is_success() { Ok(response) } else { Err(classify_status(&response)) }
}

/// Map a non-2xx response to its failure.
#[must_use]
pub fn classify_status(response: &HttpResponse) -> ApiError {
    match response.status {
        401 => ApiError::Authentication { message: MSG_UNAUTHORIZED.to_owned() },
        403 => ApiError::Forbidden { message: MSG_FORBIDDEN.to_owned() },
        404 => ApiError::NotFound { message: MSG_NOT_FOUND.to_owned() },
        500 => ApiError::Server { status: 500, message: MSG_SERVER_ERROR.to_owned() },
        status @ 501..=599 => ApiError::Server { status, message: or_request_failed(body_message(&response.body)) },
        status => ApiError::Status { status, message: or_request_failed(body_message(&response.body)) },
    }
}

fn responded(outcome: TransportOutcome) -> Result<HttpResponse, ApiError> {
    match outcome {
        TransportOutcome::Response(response) => Ok(response),
        TransportOutcome::NoResponse(detail) => Err(ApiError::Unreachable(detail)),
    }
}

fn or_request_failed(message: Option<String>) -> String {
    message
        .map(|m| m.trim().to_owned())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| MSG_REQUEST_FAILED.to_owned())
}

#[cfg(test)]
#[path = "classify_test.rs"]
mod tests;
