//! Failure taxonomy of a backend call.

/// Shown for failures that carry no usable server message.
pub const MSG_REQUEST_FAILED: &str = "Request failed";
pub const MSG_UNAUTHORIZED: &str = "Unauthorized, please log in again";
pub const MSG_FORBIDDEN: &str = "Insufficient permission";
pub const MSG_NOT_FOUND: &str = "Requested resource not found";
pub const MSG_SERVER_ERROR: &str = "Server error";
pub const MSG_NETWORK: &str = "Network error, please check your connection";

/// Coarse failure class, used to decide side effects and exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Nonzero envelope code, unexpected status, or a payload that did not parse.
    Application,
    /// HTTP 401 or envelope code 1002. Forces logout.
    Authentication,
    /// HTTP 403.
    Authorization,
    /// HTTP 404.
    Resource,
    /// HTTP 5xx.
    Server,
    /// No response arrived.
    Connectivity,
    /// The caller gave up before the call settled.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("{message} (code {code})")]
    Application { code: i64, message: String },

    #[error("{message}")]
    Authentication { message: String },

    #[error("{message}")]
    Forbidden { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message} (status {status})")]
    Server { status: u16, message: String },

    #[error("{message} (status {status})")]
    Status { status: u16, message: String },

    #[error("malformed response (status {status}): {detail}")]
    Malformed { status: u16, detail: String },

    #[error("unexpected response payload: {0}")]
    InvalidResponse(String),

    #[error("request encoding failed: {0}")]
    Encode(String),

    #[error("network error: {0}")]
    Unreachable(String),

    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Application { .. }
            | Self::Status { .. }
            | Self::Malformed { .. }
            | Self::InvalidResponse(_)
            | Self::Encode(_) => ErrorKind::Application,
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::Forbidden { .. } => ErrorKind::Authorization,
            Self::NotFound { .. } => ErrorKind::Resource,
            Self::Server { .. } => ErrorKind::Server,
            Self::Unreachable(_) => ErrorKind::Connectivity,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Text shown to the user when this failure settles. `None` for
    /// cancellation, which is silent.
    #[must_use]
    pub fn notification(&self) -> Option<&str> {
        match self {
            Self::Application { message, .. }
            | Self::Authentication { message }
            | Self::Forbidden { message }
            | Self::NotFound { message }
            | Self::Server { message, .. }
            | Self::Status { message, .. } => Some(message),
            Self::Malformed { .. } | Self::InvalidResponse(_) | Self::Encode(_) => Some(MSG_REQUEST_FAILED),
            Self::Unreachable(_) => Some(MSG_NETWORK),
            Self::Cancelled => None,
        }
    }

    /// Backend result code, when the failure came from an envelope.
    #[must_use]
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::Application { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// HTTP status, when the failure came from a non-2xx response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } | Self::Status { status, .. } | Self::Malformed { status, .. } => Some(*status),
            Self::Forbidden { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            _ => None,
        }
    }

    /// Stable machine-readable identifier, for logs and CLI output.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Application { .. } => "E_APPLICATION",
            Self::Authentication { .. } => "E_AUTHENTICATION",
            Self::Forbidden { .. } => "E_FORBIDDEN",
            Self::NotFound { .. } => "E_NOT_FOUND",
            Self::Server { .. } => "E_SERVER",
            Self::Status { .. } => "E_STATUS",
            Self::Malformed { .. } => "E_MALFORMED",
            Self::InvalidResponse(_) => "E_INVALID_RESPONSE",
            Self::Encode(_) => "E_ENCODE",
            Self::Unreachable(_) => "E_UNREACHABLE",
            Self::Cancelled => "E_CANCELLED",
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
