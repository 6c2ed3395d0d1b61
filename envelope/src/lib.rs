//! Shared wire schema for the dealership REST backend.
//!
//! This crate owns the response envelope and resource records used by both
//! the `carsales` client core and the `cli` binary. Envelope payloads stay
//! flexible (`serde_json::Value`) until a caller asks for a concrete type.
//!
//! WIRE QUIRKS
//! ===========
//! The backend serializes every 64-bit integer as a JSON string to protect
//! JavaScript clients from precision loss, so ids, counts and timestamps
//! accept either a string or a number (see [`flex`]).

pub mod flex;
pub mod records;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use records::*;

/// Application code carried by a successful envelope.
pub const SUCCESS_CODE: i64 = 0;

/// Application code meaning "credential invalid or expired".
pub const TOKEN_INVALID_CODE: i64 = 1002;

/// Error returned by envelope parsing and payload decoding.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The body is not a JSON object with the envelope shape.
    #[error("malformed envelope: {0}")]
    Malformed(#[source] serde_json::Error),
    /// The envelope `data` does not match the requested record type.
    #[error("payload does not match expected shape: {0}")]
    Payload(#[source] serde_json::Error),
}

/// The `{code, message, data, timestamp}` wrapper every backend response uses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// `0` on success, any other value is an application error.
    pub code: i64,
    /// Human-readable message; empty when the backend sent `null`.
    #[serde(default, deserialize_with = "flex::null_as_empty")]
    pub message: String,
    /// Response payload, `null` when the call returns nothing.
    #[serde(default)]
    pub data: Value,
    /// Milliseconds since the Unix epoch when the backend built the response.
    #[serde(default, deserialize_with = "flex::opt_i64")]
    pub timestamp: Option<i64>,
}

impl Envelope {
    /// Build a success envelope around `data`.
    #[must_use]
    pub fn success(data: Value) -> Self {
        Self { code: SUCCESS_CODE, message: ResultCode::Success.default_message().to_owned(), data, timestamp: None }
    }

    /// Build an error envelope with no payload.
    #[must_use]
    pub fn error(code: i64, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), data: Value::Null, timestamp: None }
    }

    /// Parse an envelope from a raw response body.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Malformed`] if the body is not an envelope.
    pub fn parse(body: &[u8]) -> Result<Self, WireError> {
        serde_json::from_slice(body).map_err(WireError::Malformed)
    }

    /// Whether `code` marks success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Whether `code` is the invalid/expired credential sentinel.
    #[must_use]
    pub fn is_token_invalid(&self) -> bool {
        self.code == TOKEN_INVALID_CODE
    }

    /// Decode `data` into a concrete record type.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Payload`] if `data` has a different shape.
    pub fn decode_data<T: DeserializeOwned>(&self) -> Result<T, WireError> {
        decode_value(self.data.clone())
    }
}

/// Decode an already-unwrapped envelope payload.
///
/// # Errors
///
/// Returns [`WireError::Payload`] if `value` has a different shape.
pub fn decode_value<T: DeserializeOwned>(value: Value) -> Result<T, WireError> {
    serde_json::from_value(value).map_err(WireError::Payload)
}

/// Extract a top-level `message` string from an arbitrary JSON error body.
///
/// Edge proxies and framework error pages do not always send an envelope,
/// so this only looks for the one field the clients display.
#[must_use]
pub fn body_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(ToOwned::to_owned)
}

/// Result codes defined by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResultCode {
    Success,
    AuthBadCredentials,
    AuthTokenInvalid,
    AuthPermissionDenied,
    ParamMissing,
    ParamFormat,
    ParamOutOfRange,
    CarNotFound,
    CarNotAvailable,
    CustomerExists,
    VinExists,
    CustomerHasOrders,
    CarSoldCannotDelete,
    DbUniqueViolation,
    DbForeignKeyViolation,
    DbCheckViolation,
    DbTransactionRollback,
    FileUpload,
    FileParse,
    DbConnection,
    Unknown,
}

impl ResultCode {
    const ALL: [Self; 21] = [
        Self::Success,
        Self::AuthBadCredentials,
        Self::AuthTokenInvalid,
        Self::AuthPermissionDenied,
        Self::ParamMissing,
        Self::ParamFormat,
        Self::ParamOutOfRange,
        Self::CarNotFound,
        Self::CarNotAvailable,
        Self::CustomerExists,
        Self::VinExists,
        Self::CustomerHasOrders,
        Self::CarSoldCannotDelete,
        Self::DbUniqueViolation,
        Self::DbForeignKeyViolation,
        Self::DbCheckViolation,
        Self::DbTransactionRollback,
        Self::FileUpload,
        Self::FileParse,
        Self::DbConnection,
        Self::Unknown,
    ];

    /// Numeric code on the wire.
    #[must_use]
    pub fn code(self) -> i64 {
        match self {
            Self::Success => SUCCESS_CODE,
            Self::AuthBadCredentials => 1001,
            Self::AuthTokenInvalid => TOKEN_INVALID_CODE,
            Self::AuthPermissionDenied => 1003,
            Self::ParamMissing => 2001,
            Self::ParamFormat => 2002,
            Self::ParamOutOfRange => 2003,
            Self::CarNotFound => 3001,
            Self::CarNotAvailable => 3002,
            Self::CustomerExists => 3003,
            Self::VinExists => 3004,
            Self::CustomerHasOrders => 3005,
            Self::CarSoldCannotDelete => 3006,
            Self::DbUniqueViolation => 4001,
            Self::DbForeignKeyViolation => 4002,
            Self::DbCheckViolation => 4003,
            Self::DbTransactionRollback => 4004,
            Self::FileUpload => 5001,
            Self::FileParse => 5002,
            Self::DbConnection => 5003,
            Self::Unknown => 5004,
        }
    }

    /// Map a wire code back to a known result code.
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// Message the backend uses when it has nothing more specific.
    #[must_use]
    pub fn default_message(self) -> &'static str {
        match self {
            Self::Success => "ok",
            Self::AuthBadCredentials => "incorrect username or password",
            Self::AuthTokenInvalid => "token invalid or expired",
            Self::AuthPermissionDenied => "permission denied",
            Self::ParamMissing => "required parameter missing",
            Self::ParamFormat => "parameter format error",
            Self::ParamOutOfRange => "parameter value out of range",
            Self::CarNotFound => "car not found",
            Self::CarNotAvailable => "car is not available for sale",
            Self::CustomerExists => "customer already exists (duplicate phone or id card)",
            Self::VinExists => "VIN already exists",
            Self::CustomerHasOrders => "customer has orders and cannot be deleted",
            Self::CarSoldCannotDelete => "sold cars cannot be deleted",
            Self::DbUniqueViolation => "unique constraint violation",
            Self::DbForeignKeyViolation => "foreign key violation",
            Self::DbCheckViolation => "check constraint violation",
            Self::DbTransactionRollback => "transaction rolled back",
            Self::FileUpload => "file upload failed",
            Self::FileParse => "file parse failed",
            Self::DbConnection => "database connection failed",
            Self::Unknown => "unknown system error",
        }
    }

    /// Whether this code forces the client to drop its session.
    #[must_use]
    pub fn is_auth_failure(self) -> bool {
        self == Self::AuthTokenInvalid
    }
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
