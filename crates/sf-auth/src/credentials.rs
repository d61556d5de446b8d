//! Long-lived credentials for the username-password flow.
//!
//! All credential types implement custom Debug to redact sensitive data.

/// Credentials exchanged for an access token.
///
/// `client_secret` and `password` are redacted in Debug output and only
/// reachable from inside this crate.
#[derive(Clone)]
pub struct PasswordCredentials {
    instance_url: String,
    client_id: String,
    client_secret: String,
    username: String,
    password: String,
}

impl std::fmt::Debug for PasswordCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordCredentials")
            .field("instance_url", &self.instance_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl PasswordCredentials {
    /// Create new credentials with the given values.
    pub fn new(
        instance_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            instance_url: instance_url.into().trim_end_matches('/').to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Get the instance URL.
    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    /// Get the connected app consumer key (client_id).
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Get the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    /// Full URL of the token endpoint for this instance.
    pub fn token_url(&self) -> String {
        format!("{}{}", self.instance_url, crate::TOKEN_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> PasswordCredentials {
        PasswordCredentials::new(
            "https://na1.salesforce.com/",
            "consumer-key",
            "consumer-secret-value",
            "user@example.com",
            "hunter2-and-token",
        )
    }

    #[test]
    fn test_accessors() {
        let creds = creds();
        assert_eq!(creds.instance_url(), "https://na1.salesforce.com");
        assert_eq!(creds.client_id(), "consumer-key");
        assert_eq!(creds.username(), "user@example.com");
        assert_eq!(creds.client_secret(), "consumer-secret-value");
        assert_eq!(creds.password(), "hunter2-and-token");
        assert_eq!(
            creds.token_url(),
            "https://na1.salesforce.com/services/oauth2/token"
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let debug_output = format!("{:?}", creds());
        assert!(debug_output.contains("[REDACTED]"));
        assert!(debug_output.contains("user@example.com"));
        assert!(!debug_output.contains("consumer-secret-value"));
        assert!(!debug_output.contains("hunter2"));
    }
}
