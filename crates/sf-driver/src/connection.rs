//! The database-connection contract.

use std::future::Future;

use crate::error::Result;

/// Operations a connection exposes to code written against a relational
/// driver.
///
/// Implementations other than [`SoqlConnection`](crate::SoqlConnection)
/// can be swapped in without touching callers that are generic over this
/// trait.
pub trait Connection {
    /// Statement handle produced by [`prepare`](Connection::prepare).
    type Statement;

    /// Bind a command to this connection's transport without executing it.
    fn prepare(&self, command: &str) -> Self::Statement;

    /// Prepare and immediately execute a command.
    fn query(&self, command: &str) -> impl Future<Output = Result<Self::Statement>> + Send;

    /// Execute a command and return the row count the remote side reported.
    fn exec(&self, command: &str) -> impl Future<Output = Result<u64>> + Send;

    /// Escape a value and wrap it in single quotes for embedding in a command.
    fn quote(&self, value: &str) -> String;

    /// Identifier of the most recent insert, if the backend reports one.
    fn last_insert_id(&self) -> Option<String>;

    /// Start a transaction.
    fn begin_transaction(&mut self) -> Result<bool>;

    /// Commit the active transaction.
    fn commit(&mut self) -> Result<bool>;

    /// Roll back the active transaction.
    fn roll_back(&mut self) -> Result<bool>;

    /// Numeric code of the last failure, `None` after a success.
    fn error_code(&self) -> Option<u16>;

    /// Human-readable description of the last failure, `None` after a success.
    fn error_info(&self) -> Option<String>;
}
