//! Error types for the driver.

use soql_connect_client::RemoteError;

/// Result type alias for driver operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for driver operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Returns true for missing or invalid construction parameters.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Configuration { .. } | ErrorKind::InvalidConfiguration(_)
        )
    }

    /// Returns true if token acquisition failed.
    pub fn is_authentication_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Authentication(_))
    }

    /// Returns true if the remote side rejected a command.
    pub fn is_remote_execution_error(&self) -> bool {
        matches!(self.kind, ErrorKind::RemoteExecution { .. })
    }

    /// Numeric code of a remote execution error.
    pub fn remote_code(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::RemoteExecution { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// State code (Salesforce `errorCode`) of a remote execution error.
    pub fn remote_state(&self) -> Option<&str> {
        match &self.kind {
            ErrorKind::RemoteExecution { state, .. } => Some(state),
            _ => None,
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// One or more required construction keys are absent.
    #[error("Configuration error: missing required parameter(s): {}", missing.join(", "))]
    Configuration { missing: Vec<String> },

    /// A construction parameter is present but unusable.
    #[error("Configuration error: {0}")]
    InvalidConfiguration(String),

    /// Token acquisition failed.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The remote API reported a failure for a command.
    #[error("Remote execution failed: [{code}] {state}: {message}")]
    RemoteExecution {
        message: String,
        state: String,
        code: u16,
    },

    /// The request never produced a usable answer (timeout, connection
    /// failure, undecodable body).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The operation is disabled by configuration.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Transaction call out of sequence.
    #[error("Transaction error: {0}")]
    Transaction(String),
}

impl From<soql_connect_client::Error> for Error {
    fn from(err: soql_connect_client::Error) -> Self {
        let kind = if err.is_remote() {
            let remote = RemoteError::from_error(&err);
            ErrorKind::RemoteExecution {
                message: remote.message,
                state: remote.state,
                code: remote.code,
            }
        } else {
            ErrorKind::Transport(err.to_string())
        };
        Error::with_source(kind, err)
    }
}

impl From<soql_connect_auth::Error> for Error {
    fn from(err: soql_connect_auth::Error) -> Self {
        Error::with_source(ErrorKind::Authentication(err.to_string()), err)
    }
}
