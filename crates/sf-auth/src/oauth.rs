//! OAuth 2.0 username-password flow.
//!
//! The flow is a single form-encoded POST to the token endpoint. It is
//! attempted once: no retry, no caching, and the HTTP client's default
//! timeouts apply.

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::credentials::PasswordCredentials;
use crate::error::{Error, ErrorKind, Result};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A bearer token obtained from the token endpoint.
///
/// Never empty. The value is redacted in Debug output and has no Display
/// implementation, so it only leaves this type through [`AccessToken::secret`].
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a token value, rejecting empty strings.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(Error::new(ErrorKind::MissingToken));
        }
        Ok(Self(value))
    }

    /// The raw token, for building the Authorization header.
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// Authenticator for the OAuth 2.0 `password` grant.
#[derive(Clone, Default)]
pub struct PasswordGrant {
    http_client: reqwest::Client,
}

impl std::fmt::Debug for PasswordGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordGrant").finish_non_exhaustive()
    }
}

impl PasswordGrant {
    /// Create an authenticator with a default HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exchange the credentials for an access token.
    ///
    /// Fails when the request cannot be sent, the endpoint answers with a
    /// non-2xx status, the body is not JSON, or `access_token` is missing or
    /// empty.
    pub async fn acquire_token(&self, credentials: &PasswordCredentials) -> Result<AccessToken> {
        let token = self.request_token(credentials).await?;
        match token.access_token {
            Some(value) => AccessToken::new(value),
            None => Err(Error::new(ErrorKind::MissingToken)),
        }
    }

    /// Send the token request and return the full token response.
    ///
    /// The credentials are not logged.
    #[instrument(skip(self, credentials), fields(instance = %credentials.instance_url()))]
    pub async fn request_token(&self, credentials: &PasswordCredentials) -> Result<TokenResponse> {
        let params = [
            ("grant_type", "password"),
            ("client_id", credentials.client_id()),
            ("client_secret", credentials.client_secret()),
            ("username", credentials.username()),
            ("password", credentials.password()),
        ];
        let body = serde_urlencoded::to_string(params)?;

        let response = self
            .http_client
            .post(credentials.token_url())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "Token request rejected");
            return Err(match serde_json::from_slice::<OAuthErrorResponse>(&body) {
                Ok(error) => Error::new(ErrorKind::OAuth {
                    error: error.error,
                    description: error.error_description,
                }),
                Err(_) => Error::new(ErrorKind::Http(format!(
                    "token endpoint returned {}",
                    status.as_u16()
                ))),
            });
        }

        let token: TokenResponse = serde_json::from_slice(&body)?;
        debug!(token_type = ?token.token_type, "Token response received");
        Ok(token)
    }

    /// Revoke an access token.
    ///
    /// The token parameter is not logged to prevent credential exposure.
    #[instrument(skip(self, token))]
    pub async fn revoke(&self, token: &AccessToken, instance_url: &str) -> Result<()> {
        let body = serde_urlencoded::to_string([("token", token.secret())])?;

        let response = self
            .http_client
            .post(format!(
                "{}{}",
                instance_url.trim_end_matches('/'),
                crate::REVOKE_PATH
            ))
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::new(ErrorKind::OAuth {
                error: "revoke_failed".to_string(),
                description: format!("revoke endpoint returned {}", response.status().as_u16()),
            }));
        }

        Ok(())
    }
}

/// Token response from the token endpoint.
///
/// Every field is optional at parse time so that a body without
/// `access_token` is reported as a missing token rather than a JSON error.
#[derive(Clone, Default, Deserialize, Serialize)]
pub struct TokenResponse {
    /// Access token.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Instance URL reported by Salesforce.
    #[serde(default)]
    pub instance_url: Option<String>,
    /// Identity URL.
    #[serde(default)]
    pub id: Option<String>,
    /// Token type (usually "Bearer").
    #[serde(default)]
    pub token_type: Option<String>,
    /// Issued at timestamp.
    #[serde(default)]
    pub issued_at: Option<String>,
    /// Signature for verification.
    #[serde(default)]
    pub signature: Option<String>,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("instance_url", &self.instance_url)
            .field("id", &self.id)
            .field("token_type", &self.token_type)
            .field("issued_at", &self.issued_at)
            .field("signature", &self.signature.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// OAuth error response.
#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
    error: String,
    #[serde(default)]
    error_description: String,
}
