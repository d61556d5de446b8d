//! Connection construction parameters.

use std::collections::HashMap;

use soql_connect_client::{ClientConfig, DEFAULT_API_VERSION};

use crate::error::{Error, ErrorKind, Result};
use crate::transaction::TransactionMode;

/// Key holding the instance base URL.
pub const SALESFORCE_INSTANCE: &str = "salesforceInstance";
/// Key holding the connected app consumer key.
pub const CONSUMER_KEY: &str = "consumerKey";
/// Key holding the connected app consumer secret.
pub const CONSUMER_SECRET: &str = "consumerSecret";
/// Optional key overriding the API version.
pub const API_VERSION: &str = "apiVersion";
/// Optional key selecting the transaction mode.
pub const TRANSACTION_MODE: &str = "transactionMode";

const REQUIRED_KEYS: [&str; 3] = [SALESFORCE_INSTANCE, CONSUMER_KEY, CONSUMER_SECRET];

/// Validated parameters for [`SoqlConnection::connect`](crate::SoqlConnection::connect).
///
/// The consumer secret is redacted in Debug output.
#[derive(Clone)]
pub struct ConnectionParams {
    instance_url: String,
    consumer_key: String,
    consumer_secret: String,
    api_version: String,
    transaction_mode: TransactionMode,
    client_config: ClientConfig,
}

impl std::fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("instance_url", &self.instance_url)
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .field("transaction_mode", &self.transaction_mode)
            .finish_non_exhaustive()
    }
}

impl ConnectionParams {
    /// Create parameters from the three required values.
    pub fn new(
        instance_url: impl Into<String>,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
    ) -> Result<Self> {
        let instance_url = validate_instance_url(instance_url.into())?;

        Ok(Self {
            instance_url,
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            transaction_mode: TransactionMode::default(),
            client_config: ClientConfig::default(),
        })
    }

    /// Build parameters from a key-value configuration.
    ///
    /// `salesforceInstance`, `consumerKey` and `consumerSecret` are required;
    /// the error names every key that is absent. `apiVersion` and
    /// `transactionMode` are read when present. Other keys are ignored.
    pub fn from_map<I, K, V>(params: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params: HashMap<String, String> = params
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let missing: Vec<String> = REQUIRED_KEYS
            .iter()
            .filter(|key| !params.contains_key(**key))
            .map(|key| key.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::new(ErrorKind::Configuration { missing }));
        }

        // All three keys were checked above.
        let mut take = |key: &str| params.remove(key).unwrap_or_default();
        let instance_url = take(SALESFORCE_INSTANCE);
        let consumer_key = take(CONSUMER_KEY);
        let consumer_secret = take(CONSUMER_SECRET);

        let mut built = Self::new(instance_url, consumer_key, consumer_secret)?;

        if let Some(version) = params.remove(API_VERSION) {
            built = built.with_api_version(version);
        }
        if let Some(mode) = params.remove(TRANSACTION_MODE) {
            built = built.with_transaction_mode(mode.parse()?);
        }

        Ok(built)
    }

    /// Load parameters from environment variables.
    ///
    /// - `SF_INSTANCE_URL` → `salesforceInstance`
    /// - `SF_CONSUMER_KEY` → `consumerKey`
    /// - `SF_CONSUMER_SECRET` → `consumerSecret`
    /// - `SF_API_VERSION` → `apiVersion` (optional)
    /// - `SF_TRANSACTION_MODE` → `transactionMode` (optional)
    ///
    /// Each variable also accepts a `SALESFORCE_` prefix. Missing variables
    /// are reported by their parameter key.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        const ENV_KEYS: [(&str, &str); 5] = [
            (SALESFORCE_INSTANCE, "INSTANCE_URL"),
            (CONSUMER_KEY, "CONSUMER_KEY"),
            (CONSUMER_SECRET, "CONSUMER_SECRET"),
            (API_VERSION, "API_VERSION"),
            (TRANSACTION_MODE, "TRANSACTION_MODE"),
        ];

        let params = ENV_KEYS.iter().filter_map(|(key, suffix)| {
            lookup(&format!("SF_{suffix}"))
                .or_else(|| lookup(&format!("SALESFORCE_{suffix}")))
                .map(|value| (*key, value))
        });

        Self::from_map(params)
    }

    /// Set the API version (e.g., "62.0").
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into().trim_start_matches('v').to_string();
        self
    }

    /// Set the transaction mode.
    pub fn with_transaction_mode(mut self, mode: TransactionMode) -> Self {
        self.transaction_mode = mode;
        self
    }

    /// Set the HTTP client configuration for the authenticated transport.
    pub fn with_client_config(mut self, config: ClientConfig) -> Self {
        self.client_config = config;
        self
    }

    /// Get the instance URL (no trailing slash).
    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    /// Get the consumer key.
    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    pub(crate) fn consumer_secret(&self) -> &str {
        &self.consumer_secret
    }

    /// Get the API version.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Get the transaction mode.
    pub fn transaction_mode(&self) -> TransactionMode {
        self.transaction_mode
    }

    /// Get the HTTP client configuration.
    pub fn client_config(&self) -> &ClientConfig {
        &self.client_config
    }
}

fn validate_instance_url(raw: String) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/').to_string();
    let parsed = url::Url::parse(&trimmed).map_err(|e| {
        Error::with_source(
            ErrorKind::InvalidConfiguration(format!("{SALESFORCE_INSTANCE} is not a valid URL")),
            e,
        )
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::new(ErrorKind::InvalidConfiguration(format!(
            "{SALESFORCE_INSTANCE} must use http or https"
        ))));
    }

    Ok(trimmed)
}
