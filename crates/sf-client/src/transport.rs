//! Authenticated transport bound to one Salesforce instance.
//!
//! `AuthenticatedTransport` carries the bearer token, `X-PrettyPrint: 1`
//! and the JSON content type as default headers of its HTTP client. They are
//! set once in [`AuthenticatedTransport::new`] and never change afterwards.
//!
//! ## Security
//!
//! - The access token only lives inside a header marked sensitive
//! - Debug output never includes the token
//! - Requests only go to the instance the transport was built for, so the
//!   token never follows a URL to another host

use std::sync::{Arc, Mutex, PoisonError};

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::client::SfHttpClient;
use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::RequestBuilder;
use crate::DEFAULT_API_VERSION;

/// The last failure observed on a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    /// HTTP status, or 0 when the request never got an answer.
    pub code: u16,
    /// Salesforce error code (e.g. `MALFORMED_QUERY`) or a transport state.
    pub state: String,
    /// Human-readable message, already sanitized.
    pub message: String,
}

impl RemoteError {
    /// Derive the diagnostic record for a failed request.
    pub fn from_error(err: &Error) -> Self {
        let (state, message) = match &err.kind {
            ErrorKind::SalesforceApi {
                error_code,
                message,
                ..
            } => (error_code.clone(), message.clone()),
            ErrorKind::Http { status, message } => (format!("HTTP_{status}"), message.clone()),
            ErrorKind::Authentication(message) => ("UNAUTHORIZED".to_string(), message.clone()),
            ErrorKind::Authorization(message) => ("FORBIDDEN".to_string(), message.clone()),
            ErrorKind::NotFound(message) => ("NOT_FOUND".to_string(), message.clone()),
            ErrorKind::Timeout => ("TIMEOUT".to_string(), err.to_string()),
            ErrorKind::Connection(message) => ("CONNECTION_FAILURE".to_string(), message.clone()),
            ErrorKind::Json(message) => ("INVALID_RESPONSE".to_string(), message.clone()),
            _ => ("CLIENT_ERROR".to_string(), err.to_string()),
        };

        Self {
            code: err.status().unwrap_or(0),
            state,
            message,
        }
    }
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.state, self.message)
    }
}

/// HTTP transport bound to an instance URL and an access token.
///
/// Clones share the underlying connection pool and the last-error slot.
#[derive(Clone)]
pub struct AuthenticatedTransport {
    http: SfHttpClient,
    instance_url: String,
    api_version: String,
    last_error: Arc<Mutex<Option<RemoteError>>>,
}

impl std::fmt::Debug for AuthenticatedTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedTransport")
            .field("instance_url", &self.instance_url)
            .field("access_token", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

impl AuthenticatedTransport {
    /// Build a transport for `instance_url` that authenticates with `access_token`.
    ///
    /// Fails if the URL is not absolute http(s) or the token is empty.
    pub fn new(
        instance_url: impl Into<String>,
        access_token: &str,
        config: ClientConfig,
    ) -> Result<Self> {
        let instance_url = instance_url.into().trim_end_matches('/').to_string();
        let parsed = url::Url::parse(&instance_url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::new(ErrorKind::InvalidUrl(format!(
                "unsupported scheme '{}'",
                parsed.scheme()
            ))));
        }

        if access_token.is_empty() {
            return Err(Error::new(ErrorKind::Config(
                "access token must not be empty".to_string(),
            )));
        }

        let mut headers = HeaderMap::new();
        let mut bearer = HeaderValue::from_str(&format!("Bearer {access_token}"))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert("X-PrettyPrint", HeaderValue::from_static("1"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = SfHttpClient::with_default_headers(config, headers)?;

        Ok(Self {
            http,
            instance_url,
            api_version: DEFAULT_API_VERSION.to_string(),
            last_error: Arc::new(Mutex::new(None)),
        })
    }

    /// Set the API version (e.g., "62.0").
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Get the instance URL.
    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    /// Get the API version.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Build the full URL for a path.
    ///
    /// Relative paths are joined to the instance URL. Absolute URLs are only
    /// accepted when they point at the instance itself (same scheme, host
    /// and port).
    pub fn url(&self, path: &str) -> Result<String> {
        if !(path.starts_with("http://") || path.starts_with("https://")) {
            return Ok(if path.starts_with('/') {
                format!("{}{}", self.instance_url, path)
            } else {
                format!("{}/{}", self.instance_url, path)
            });
        }

        let target = url::Url::parse(path)?;
        let instance = url::Url::parse(&self.instance_url)?;
        if target.origin() != instance.origin() {
            return Err(Error::new(ErrorKind::InvalidUrl(format!(
                "refusing to send credentials to '{}'",
                target.host_str().unwrap_or_default()
            ))));
        }
        Ok(path.to_string())
    }

    /// Build the query endpoint URL for a SOQL command.
    ///
    /// `include_deleted` selects `queryAll`, which also returns deleted and
    /// archived records.
    pub fn query_url(&self, soql: &str, include_deleted: bool) -> String {
        let resource = if include_deleted { "queryAll" } else { "query" };
        format!(
            "{}/services/data/v{}/{}?q={}",
            self.instance_url,
            self.api_version,
            resource,
            urlencoding::encode(soql)
        )
    }

    fn get(&self, url: &str) -> Result<RequestBuilder> {
        Ok(self.http.get(self.url(url)?))
    }

    /// Send a request and deserialize the JSON response.
    ///
    /// The outcome is recorded: failures become the transport's last error,
    /// a success clears it.
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let result = self.http.send_json(request).await;
        self.record(result.as_ref().err().map(RemoteError::from_error));
        result
    }

    /// GET request with JSON response deserialization.
    ///
    /// A URL rejected by [`url`](Self::url) is recorded like any other
    /// failure.
    async fn get_with_options<T: DeserializeOwned>(
        &self,
        url: &str,
        batch_size: Option<u32>,
    ) -> Result<T> {
        let mut request = match self.get(url) {
            Ok(request) => request,
            Err(err) => {
                self.record(Some(RemoteError::from_error(&err)));
                return Err(err);
            }
        };
        if let Some(size) = batch_size {
            request = request.sforce_query_options(size);
        }
        self.send_json(request).await
    }

    /// Run a SOQL query and follow `nextRecordsUrl` until every page is read.
    ///
    /// The returned result holds all records with `done` set.
    #[instrument(skip(self, soql), fields(instance = %self.instance_url))]
    pub async fn query_all<T: DeserializeOwned>(
        &self,
        soql: &str,
        include_deleted: bool,
        batch_size: Option<u32>,
    ) -> Result<QueryResult<T>> {
        let mut result: QueryResult<T> = self
            .get_with_options(&self.query_url(soql, include_deleted), batch_size)
            .await?;
        let mut pages = 1usize;

        while let Some(next_url) = result.next_records_url.take() {
            let page: QueryResult<T> = self.get_with_options(&next_url, batch_size).await?;
            result.records.extend(page.records);
            result.done = page.done;
            result.next_records_url = page.next_records_url;
            pages += 1;
        }

        debug!(
            pages,
            total_size = result.total_size,
            fetched = result.records.len(),
            "Query complete"
        );

        result.done = true;
        Ok(result)
    }

    /// The last failure seen by this transport or any of its clones.
    pub fn last_error(&self) -> Option<RemoteError> {
        self.last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, outcome: Option<RemoteError>) {
        *self.last_error.lock().unwrap_or_else(PoisonError::into_inner) = outcome;
    }

    /// Commit primitive.
    ///
    /// The REST API applies every request on its own, so there is never
    /// pending work: reports `true`.
    pub fn commit(&self) -> bool {
        true
    }

    /// Rollback primitive.
    ///
    /// Work that already reached the REST API cannot be undone: reports
    /// `false`.
    pub fn rollback(&self) -> bool {
        false
    }
}

/// Result of a SOQL query.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct QueryResult<T> {
    /// Total number of records matching the query.
    #[serde(rename = "totalSize")]
    pub total_size: u64,

    /// Whether all records are returned (no more pages).
    pub done: bool,

    /// URL to fetch next batch of results.
    #[serde(rename = "nextRecordsUrl", default)]
    pub next_records_url: Option<String>,

    /// The records.
    #[serde(default = "Vec::new")]
    pub records: Vec<T>,
}
