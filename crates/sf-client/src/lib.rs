//! # soql-connect-client
//!
//! HTTP transport for the Salesforce query API.
//!
//! This crate provides the network layer that the connection driver sits on:
//! - A thin reqwest wrapper with compression and request tracing
//! - An authenticated transport with the bearer token and fixed headers
//!   baked in at construction
//! - Salesforce error body parsing with message sanitizing
//! - SOQL literal escaping
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Connection / Statement                    │
//! │                 (soql-connect-driver)                       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 AuthenticatedTransport                      │
//! │  - Instance URL, API version, bearer token                  │
//! │  - Query URL building, paginated query_all                 │
//! │  - Last error diagnostics shared by clones                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    SfHttpClient                             │
//! │  - Raw HTTP with default headers and compression            │
//! │  - Salesforce error mapping                                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use soql_connect_client::{AuthenticatedTransport, ClientConfig, QueryResult};
//!
//! let transport = AuthenticatedTransport::new(
//!     "https://na1.salesforce.com",
//!     token,
//!     ClientConfig::default(),
//! )?;
//!
//! let result: QueryResult<serde_json::Value> = transport
//!     .query_all("SELECT Id FROM Account", false, None)
//!     .await?;
//! ```

mod client;
mod config;
mod error;
mod request;
mod response;
pub mod security;
mod transport;

pub use client::SfHttpClient;
pub use config::{ClientConfig, ClientConfigBuilder, CompressionConfig};
pub use error::{Error, ErrorKind, Result};
pub use request::RequestBuilder;
pub use response::Response;
pub use transport::{AuthenticatedTransport, QueryResult, RemoteError};

/// Default Salesforce API version
pub const DEFAULT_API_VERSION: &str = "62.0";

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("soql-connect/", env!("CARGO_PKG_VERSION"));
