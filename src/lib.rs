//! Session and request core of the dealership clients.
//!
//! SYSTEM CONTEXT
//! ==============
//! ```text
//! command ─► Router (guard) ─► page loader ─► api::* ─► Pipeline ─► backend
//!              │                                          │
//!              └──────────── SessionStore ◄───────────────┘
//!                                │
//!                         SessionStorage
//! ```
//!
//! [`client::DealerClient`] wires the pieces for one process. The desktop and
//! mobile clients differ only in their route table and how notifications are
//! shown.

pub mod api;
pub mod client;
pub mod config;
pub mod notify;
pub mod pipeline;
pub mod routes;
pub mod session;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use client::{ClientError, DealerClient};
pub use config::{ClientConfig, ClientVariant};
pub use pipeline::{ApiError, ErrorKind, Pipeline};
pub use session::SessionStore;
