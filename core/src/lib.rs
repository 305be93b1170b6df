//! Blocking client for the NextDNS management API.
//!
//! # Overview
//! Requests are built as plain `HttpRequest` values and responses are
//! classified from plain `HttpResponse` values. The network round-trip sits
//! behind the [`Transport`] trait; [`UreqTransport`] is the default, and
//! tests substitute their own.
//!
//! # Design
//! - `Client` holds only the base URL, credentials and transport. Resource
//!   services borrow it (`client.allowlist()`, `client.analytics()`, ...).
//! - Every response goes through one classifier, so a 200 that carries an
//!   `errors` envelope fails the same way a 4xx does.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.
//!
//! ```no_run
//! use nextdns_core::{Client, GetAllowlistRequest};
//!
//! let client = Client::builder().api_key("key").build()?;
//! let entries = client.allowlist().get(&GetAllowlistRequest {
//!     profile_id: "abc123".to_string(),
//! })?;
//! # Ok::<(), nextdns_core::ApiError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod response;
pub mod services;
pub mod transport;

#[cfg(test)]
mod testing;

pub use client::{Client, ClientBuilder};
pub use config::ClientConfig;
pub use error::{ApiError, ErrorDetail, ErrorKind, ErrorResponse, ErrorSource, ResponseError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use response::Page;
pub use services::*;
pub use transport::{Transport, TransportError, UreqTransport};
