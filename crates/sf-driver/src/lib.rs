//! # soql-connect-driver
//!
//! A relational-database style connection over the Salesforce query API.
//!
//! [`SoqlConnection`] authenticates once with the OAuth 2.0 password grant,
//! builds a single bearer-authenticated transport, and then exposes the
//! usual connection surface through the [`Connection`] trait: prepare,
//! query, exec, quote, transactions and error introspection.
//!
//! ## Transactions
//!
//! The REST API has no session-scoped transactions. The behaviour is chosen
//! with [`TransactionMode`]:
//! - `Emulated` (default): `begin_transaction` reports `true`, `commit`
//!   reports `true` and `roll_back` reports `false`, in any order.
//!   Statements are applied as soon as they run; nothing is atomic.
//! - `Strict`: the same results, but a nested begin or a commit/rollback
//!   without a begin fails with a transaction error.
//! - `Reject`: every transaction call fails with an unsupported error.
//!
//! ## Example
//!
//! ```rust,ignore
//! use soql_connect_driver::{Connection, ConnectionParams, SoqlConnection};
//!
//! let params = ConnectionParams::from_map([
//!     ("salesforceInstance", "https://na1.salesforce.com"),
//!     ("consumerKey", "..."),
//!     ("consumerSecret", "..."),
//! ])?;
//! let conn = SoqlConnection::connect(params, "user@example.com", "password").await?;
//!
//! let name = conn.quote("O'Brien");
//! let mut stmt = conn
//!     .query(&format!("SELECT Id, Name FROM Contact WHERE LastName = {name}"))
//!     .await?;
//! while let Some(row) = stmt.fetch() {
//!     println!("{}", row["Id"]);
//! }
//! ```

mod connection;
mod error;
mod params;
mod soql_connection;
mod statement;
mod transaction;

pub use connection::Connection;
pub use error::{Error, ErrorKind, Result};
pub use params::ConnectionParams;
pub use soql_connection::SoqlConnection;
pub use statement::{QueryOptions, Record, SoqlStatement};
pub use transaction::{TransactionMode, TransactionState};

/// Re-export of the transport layer.
pub use soql_connect_client as client;
/// Re-export of the authentication layer.
pub use soql_connect_auth as auth;
