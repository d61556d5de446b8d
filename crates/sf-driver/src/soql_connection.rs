//! Connection over the Salesforce REST query API.

use soql_connect_auth::{AccessToken, PasswordCredentials, PasswordGrant};
use soql_connect_client::security::soql;
use soql_connect_client::AuthenticatedTransport;
use tracing::{info, instrument, warn};

use crate::connection::Connection;
use crate::error::{Error, ErrorKind, Result};
use crate::params::ConnectionParams;
use crate::statement::{QueryOptions, SoqlStatement};
use crate::transaction::{TransactionMode, TransactionState};

/// A connection authenticated once at construction.
///
/// The token and transport are owned by this value; statements hold clones
/// of the transport. There is no token refresh: once the token expires,
/// every call fails with a remote execution error (HTTP 401).
///
/// Transaction state is a plain field behind `&mut self`. Share a
/// connection across tasks only behind your own lock, or open one
/// connection per task.
#[derive(Debug)]
pub struct SoqlConnection {
    transport: AuthenticatedTransport,
    access_token: AccessToken,
    transaction_mode: TransactionMode,
    transaction_state: TransactionState,
}

impl SoqlConnection {
    /// Authenticate and build the connection.
    ///
    /// Nothing is returned unless the token was obtained and the transport
    /// built.
    pub async fn connect(
        params: ConnectionParams,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        Self::connect_with(params, username, password, &PasswordGrant::new()).await
    }

    /// Like [`connect`](Self::connect) with a caller-supplied authenticator.
    #[instrument(
        skip(params, username, password, authenticator),
        fields(instance = %params.instance_url(), api_version = %params.api_version())
    )]
    pub async fn connect_with(
        params: ConnectionParams,
        username: impl Into<String>,
        password: impl Into<String>,
        authenticator: &PasswordGrant,
    ) -> Result<Self> {
        let credentials = PasswordCredentials::new(
            params.instance_url(),
            params.consumer_key(),
            params.consumer_secret(),
            username,
            password,
        );

        let access_token = authenticator.acquire_token(&credentials).await?;

        let transport = AuthenticatedTransport::new(
            params.instance_url(),
            access_token.secret(),
            params.client_config().clone(),
        )?
        .with_api_version(params.api_version());

        info!(transaction_mode = %params.transaction_mode(), "Connected");

        Ok(Self {
            transport,
            access_token,
            transaction_mode: params.transaction_mode(),
            transaction_state: TransactionState::NotStarted,
        })
    }

    /// Get the instance URL.
    pub fn instance_url(&self) -> &str {
        self.transport.instance_url()
    }

    /// Get the API version.
    pub fn api_version(&self) -> &str {
        self.transport.api_version()
    }

    /// The shared transport every statement of this connection uses.
    pub fn transport(&self) -> &AuthenticatedTransport {
        &self.transport
    }

    /// Get the transaction mode.
    pub fn transaction_mode(&self) -> TransactionMode {
        self.transaction_mode
    }

    /// Whether a transaction has been started and not yet finished.
    pub fn in_transaction(&self) -> bool {
        self.transaction_state == TransactionState::Active
    }

    /// Prepare a command with query options.
    pub fn prepare_with(&self, command: &str, options: QueryOptions) -> SoqlStatement {
        SoqlStatement::new(self.transport.clone(), command).with_options(options)
    }

    /// Prepare and execute a command with query options.
    pub async fn query_with(&self, command: &str, options: QueryOptions) -> Result<SoqlStatement> {
        let mut stmt = self.prepare_with(command, options);
        stmt.execute().await?;
        Ok(stmt)
    }

    /// Close the connection and revoke its access token.
    ///
    /// Revocation is best effort: a failure is logged and otherwise ignored.
    pub async fn close(self) {
        self.close_with(&PasswordGrant::new()).await;
    }

    /// Like [`close`](Self::close) with a caller-supplied authenticator.
    pub async fn close_with(self, authenticator: &PasswordGrant) {
        if self.in_transaction() {
            warn!("Closing with an emulated transaction still open");
        }

        if let Err(err) = authenticator
            .revoke(&self.access_token, self.transport.instance_url())
            .await
        {
            warn!(error = %err, "Token revocation failed");
        }
    }

    fn ensure_transactions_enabled(&self) -> Result<()> {
        match self.transaction_mode {
            TransactionMode::Emulated | TransactionMode::Strict => Ok(()),
            TransactionMode::Reject => Err(Error::new(ErrorKind::Unsupported(
                "transactions are not available over the REST query API".to_string(),
            ))),
        }
    }

    /// Clear the transaction marker. Only `Strict` requires one to be set.
    fn finish_transaction(&mut self) -> Result<()> {
        self.ensure_transactions_enabled()?;
        if self.transaction_mode == TransactionMode::Strict
            && self.transaction_state != TransactionState::Active
        {
            return Err(Error::new(ErrorKind::Transaction(
                "there is no active transaction".to_string(),
            )));
        }
        self.transaction_state = TransactionState::NotStarted;
        Ok(())
    }
}

impl Connection for SoqlConnection {
    type Statement = SoqlStatement;

    fn prepare(&self, command: &str) -> SoqlStatement {
        self.prepare_with(command, QueryOptions::default())
    }

    async fn query(&self, command: &str) -> Result<SoqlStatement> {
        self.query_with(command, QueryOptions::default()).await
    }

    async fn exec(&self, command: &str) -> Result<u64> {
        let mut stmt = self.prepare(command);
        stmt.execute().await
    }

    fn quote(&self, value: &str) -> String {
        soql::quote(value)
    }

    /// Always `None`: the query endpoint only reads, so no execution on this
    /// connection ever reports a created identifier.
    fn last_insert_id(&self) -> Option<String> {
        None
    }

    /// Reports `true` without creating any atomicity on the remote side.
    fn begin_transaction(&mut self) -> Result<bool> {
        self.ensure_transactions_enabled()?;
        if self.transaction_mode == TransactionMode::Strict
            && self.transaction_state == TransactionState::Active
        {
            return Err(Error::new(ErrorKind::Transaction(
                "a transaction is already active; nesting is not supported".to_string(),
            )));
        }

        warn!("Emulated transaction started: statements apply immediately and cannot be rolled back");
        self.transaction_state = TransactionState::Active;
        Ok(true)
    }

    fn commit(&mut self) -> Result<bool> {
        self.finish_transaction()?;
        Ok(self.transport.commit())
    }

    fn roll_back(&mut self) -> Result<bool> {
        self.finish_transaction()?;
        let rolled_back = self.transport.rollback();
        if !rolled_back {
            warn!("Rollback requested but statements were already applied remotely");
        }
        Ok(rolled_back)
    }

    fn error_code(&self) -> Option<u16> {
        self.transport.last_error().map(|e| e.code)
    }

    fn error_info(&self) -> Option<String> {
        self.transport.last_error().map(|e| e.to_string())
    }
}
