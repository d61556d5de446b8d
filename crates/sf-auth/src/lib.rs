//! # soql-connect-auth
//!
//! Credential handling and the OAuth 2.0 username-password flow.
//!
//! ## Security
//!
//! - Secrets, passwords and tokens are redacted in Debug output
//! - Tracing spans skip credential parameters
//! - Error messages never echo credential values
//!
//! ## Example
//!
//! ```rust,ignore
//! use soql_connect_auth::{PasswordCredentials, PasswordGrant};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), soql_connect_auth::Error> {
//!     let creds = PasswordCredentials::new(
//!         "https://na1.salesforce.com",
//!         "consumer-key",
//!         "consumer-secret",
//!         "user@example.com",
//!         "password",
//!     );
//!     let token = PasswordGrant::new().acquire_token(&creds).await?;
//!     Ok(())
//! }
//! ```

mod credentials;
mod error;
mod oauth;

pub use credentials::PasswordCredentials;
pub use error::{Error, ErrorKind, Result};
pub use oauth::{AccessToken, PasswordGrant, TokenResponse};

/// Token endpoint path, relative to the instance URL.
pub const TOKEN_PATH: &str = "/services/oauth2/token";

/// Revocation endpoint path, relative to the instance URL.
pub const REVOKE_PATH: &str = "/services/oauth2/revoke";
