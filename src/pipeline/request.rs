//! Caller-side description of a backend call.

use serde::Serialize;
use serde_json::Value;

use super::transport::Method;

/// What to call. The pipeline adds the request id and credential.
///
/// Encoding failures from [`ApiRequest::query`] or [`ApiRequest::json`] are
/// held until the pipeline runs the request, so they settle like any other
/// failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    encode_error: Option<String>,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: Vec::new(), body: None, encode_error: None }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Append one query parameter.
    #[must_use]
    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_owned(), value.to_string()));
        self
    }

    /// Append every set field of `params` as query parameters.
    #[must_use]
    pub fn query(mut self, params: &impl Serialize) -> Self {
        match query_pairs(params) {
            Ok(pairs) => self.query.extend(pairs),
            Err(e) => self.fail(e),
        }
        self
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn json(mut self, body: &impl Serialize) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => self.body = Some(value),
            Err(e) => self.fail(e),
        }
        self
    }

    /// The first encoding error hit while building, if any.
    #[must_use]
    pub fn encode_error(&self) -> Option<&str> {
        self.encode_error.as_deref()
    }

    fn fail(&mut self, error: serde_json::Error) {
        self.encode_error.get_or_insert_with(|| error.to_string());
    }
}

/// Flatten a struct into query pairs. `null` fields are skipped; scalars are
/// rendered without JSON quoting.
///
/// # Errors
///
/// Fails if `params` does not serialize to a JSON object.
pub fn query_pairs<T: Serialize>(params: &T) -> Result<Vec<(String, String)>, serde_json::Error> {
    let Value::Object(map) = serde_json::to_value(params)? else {
        return Err(serde::ser::Error::custom("query parameters must serialize to an object"));
    };
    Ok(map
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect())
}

#[cfg(test)]
#[path = "request_test.rs"]
mod tests;
