//! Typed backend calls.
//!
//! One async function per endpoint. Each builds an [`ApiRequest`] and names
//! the payload type; everything else (credential, classification,
//! notification, logout on rejected credential) is the pipeline's job.
//! Paths are relative to the configured base URL, which already ends in
//! `/api`.
//!
//! [`ApiRequest`]: crate::pipeline::ApiRequest

pub mod auth;
pub mod cars;
pub mod customers;
pub mod orders;
pub mod statistics;

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
