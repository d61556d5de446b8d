//! HTTP response handling with Salesforce-specific extensions.

use serde::de::DeserializeOwned;

use crate::error::{Error, ErrorKind, Result};

/// Wrapper around an HTTP response.
#[derive(Debug)]
pub struct Response {
    inner: reqwest::Response,
}

impl Response {
    pub(crate) fn new(inner: reqwest::Response) -> Self {
        Self { inner }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    /// Returns true if the response status is successful (2xx).
    pub fn is_success(&self) -> bool {
        self.inner.status().is_success()
    }

    /// Get the response body as text.
    pub async fn text(self) -> Result<String> {
        self.inner.text().await.map_err(Into::into)
    }

    /// Deserialize the response body as JSON.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let body = self.inner.bytes().await?;
        serde_json::from_slice(&body).map_err(Into::into)
    }

    /// Turn a non-success response into the matching error.
    pub(crate) async fn check_salesforce_error(self) -> Result<Response> {
        if self.is_success() {
            return Ok(self);
        }

        let status = self.status();
        let body = self.text().await.unwrap_or_default();
        Err(parse_error_response(status, &body))
    }
}

/// Parse an error response body and convert it to the appropriate error kind.
fn parse_error_response(status: u16, body: &str) -> Error {
    // Salesforce usually answers with an array of errors
    if let Ok(errors) = serde_json::from_str::<Vec<SalesforceErrorResponse>>(body) {
        if let Some(err) = errors.into_iter().next() {
            return Error::new(err.into_kind(status));
        }
    }

    if let Ok(err) = serde_json::from_str::<SalesforceErrorResponse>(body) {
        return Error::new(err.into_kind(status));
    }

    let sanitized = sanitize_error_message(body);
    let kind = match status {
        401 => ErrorKind::Authentication(sanitized),
        403 => ErrorKind::Authorization(sanitized),
        404 => ErrorKind::NotFound(sanitized),
        _ => ErrorKind::Http {
            status,
            message: sanitized,
        },
    };

    Error::new(kind)
}

/// Sanitize an error message to prevent exposing sensitive data.
///
/// Access tokens and session ids are redacted; messages longer than 500
/// characters are truncated.
fn sanitize_error_message(message: &str) -> String {
    const MAX_LENGTH: usize = 500;

    let mut sanitized = message.to_string();

    // Salesforce tokens look like "<org id>!<opaque>"
    if let Ok(token_pattern) = regex_lite::Regex::new(r"00[A-Za-z0-9]{13,}[!][A-Za-z0-9_.]+") {
        sanitized = token_pattern
            .replace_all(&sanitized, "[REDACTED_TOKEN]")
            .to_string();
    }

    if let Ok(session_pattern) = regex_lite::Regex::new(r"sid=[A-Za-z0-9]{20,}") {
        sanitized = session_pattern
            .replace_all(&sanitized, "sid=[REDACTED]")
            .to_string();
    }

    if sanitized.len() > MAX_LENGTH {
        let mut cut = MAX_LENGTH;
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized.truncate(cut);
        sanitized.push_str("...[truncated]");
    }

    sanitized
}

/// Salesforce API error response format.
#[derive(Debug, serde::Deserialize)]
struct SalesforceErrorResponse {
    #[serde(alias = "errorCode")]
    error_code: String,
    message: String,
    fields: Option<Vec<String>>,
}

impl SalesforceErrorResponse {
    fn into_kind(self, status: u16) -> ErrorKind {
        ErrorKind::SalesforceApi {
            status,
            error_code: self.error_code,
            message: sanitize_error_message(&self.message),
            fields: self.fields.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_redacts_access_tokens() {
        let msg = "Session expired: 00Dxx0000001gEF!AQcAQH3k9s7LKbp_example_token_value.here";
        let sanitized = sanitize_error_message(msg);
        assert!(sanitized.contains("[REDACTED_TOKEN]"), "{sanitized}");
        assert!(!sanitized.contains("AQcAQH3k9s7LKbp"), "{sanitized}");
    }

    #[test]
    fn test_sanitize_redacts_session_ids() {
        let sanitized = sanitize_error_message("Invalid session: sid=abc123def456ghi789jkl012");
        assert!(sanitized.contains("sid=[REDACTED]"));
        assert!(!sanitized.contains("abc123def456"));
    }

    #[test]
    fn test_sanitize_truncates_long_messages() {
        let sanitized = sanitize_error_message(&"é".repeat(400));
        assert!(sanitized.ends_with("...[truncated]"));
        assert!(sanitized.len() <= 500 + "...[truncated]".len());
    }

    #[test]
    fn test_sanitize_passes_through_clean_messages() {
        let msg = "No such column 'foo' on entity 'Account'";
        assert_eq!(sanitize_error_message(msg), msg);
    }

    #[test]
    fn test_parse_array_error_body() {
        let body = r#"[{"errorCode":"MALFORMED_QUERY","message":"unexpected token: FORM"}]"#;
        let err = parse_error_response(400, body);
        match err.kind {
            ErrorKind::SalesforceApi {
                status,
                error_code,
                message,
                fields,
            } => {
                assert_eq!(status, 400);
                assert_eq!(error_code, "MALFORMED_QUERY");
                assert_eq!(message, "unexpected token: FORM");
                assert!(fields.is_empty());
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn test_parse_single_object_error_body() {
        let body = r#"{"errorCode":"INVALID_SESSION_ID","message":"Session expired or invalid"}"#;
        let err = parse_error_response(401, body);
        assert!(matches!(
            err.kind,
            ErrorKind::SalesforceApi { status: 401, ref error_code, .. } if error_code == "INVALID_SESSION_ID"
        ));
        assert!(err.is_auth_error());
    }

    #[test]
    fn test_parse_unstructured_bodies_by_status() {
        assert!(matches!(
            parse_error_response(401, "nope").kind,
            ErrorKind::Authentication(_)
        ));
        assert!(matches!(
            parse_error_response(403, "nope").kind,
            ErrorKind::Authorization(_)
        ));
        assert!(matches!(
            parse_error_response(404, "").kind,
            ErrorKind::NotFound(_)
        ));
        assert!(matches!(
            parse_error_response(502, "<html>bad gateway</html>").kind,
            ErrorKind::Http { status: 502, .. }
        ));
        // An empty error array is not a Salesforce error
        assert!(matches!(
            parse_error_response(400, "[]").kind,
            ErrorKind::Http { status: 400, .. }
        ));
    }
}
