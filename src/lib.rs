//! # soql-connect
//!
//! Database-connection style access to the Salesforce SOQL query API.
//!
//! Code written against a relational driver (prepare, exec, quote,
//! transactions, error introspection) can run its read queries against a
//! Salesforce org through this library.
//!
//! ## Security
//!
//! - Tokens, consumer secrets and passwords are redacted in Debug output
//! - Tracing spans skip credential parameters
//! - Error messages are sanitized before they are stored or logged
//!
//! ## Crates
//!
//! - **soql-connect-client** - Bearer-authenticated HTTP transport, error mapping, SOQL escaping
//! - **soql-connect-auth** - OAuth 2.0 username-password grant and credential handling
//! - **soql-connect-driver** - The `Connection` contract and its SOQL implementation
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use soql_connect::driver::{Connection, ConnectionParams, SoqlConnection};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let params = ConnectionParams::from_env()?;
//!     let conn = SoqlConnection::connect(params, "user@example.com", "password").await?;
//!
//!     let count = conn.exec("SELECT Id FROM Account LIMIT 10").await?;
//!     println!("{count} accounts");
//!
//!     Ok(())
//! }
//! ```

pub use soql_connect_auth as auth;
pub use soql_connect_client as client;
pub use soql_connect_driver as driver;

pub use soql_connect_driver::{
    Connection, ConnectionParams, Error, ErrorKind, QueryOptions, Record, Result, SoqlConnection,
    SoqlStatement, TransactionMode,
};
