//! Transaction emulation settings.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind};

/// How transaction calls behave on a connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransactionMode {
    /// Accept transaction calls without any atomicity.
    ///
    /// `begin_transaction` always reports `true`; `commit` and `roll_back`
    /// always report whatever the transport primitive reports, whether or
    /// not a transaction was started.
    #[default]
    Emulated,
    /// Like `Emulated`, but calls out of sequence fail with
    /// `ErrorKind::Transaction`: a nested begin, or a commit or rollback
    /// without an active transaction.
    Strict,
    /// Fail every transaction call with `ErrorKind::Unsupported`.
    Reject,
}

impl fmt::Display for TransactionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionMode::Emulated => f.write_str("emulated"),
            TransactionMode::Strict => f.write_str("strict"),
            TransactionMode::Reject => f.write_str("reject"),
        }
    }
}

impl FromStr for TransactionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "emulated" => Ok(TransactionMode::Emulated),
            "strict" => Ok(TransactionMode::Strict),
            "reject" => Ok(TransactionMode::Reject),
            other => Err(Error::new(ErrorKind::InvalidConfiguration(format!(
                "unknown transaction mode '{other}' (expected 'emulated', 'strict' or 'reject')"
            )))),
        }
    }
}

/// In-process transaction marker. Nothing on the remote side backs it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransactionState {
    #[default]
    NotStarted,
    Active,
}
