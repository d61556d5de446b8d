//! HTTP request building with Salesforce-specific headers.

/// Builder for GET requests.
///
/// Authentication and the fixed Salesforce headers are not set here; they
/// live on the client as default headers.
#[derive(Debug)]
pub struct RequestBuilder {
    pub(crate) url: String,
    pub(crate) headers: Vec<(String, String)>,
}

impl RequestBuilder {
    /// Create a new request builder.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    /// The request URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set Sforce-Query-Options header (for query batch size).
    pub fn sforce_query_options(self, batch_size: u32) -> Self {
        self.header("Sforce-Query-Options", format!("batchSize={}", batch_size))
    }
}
