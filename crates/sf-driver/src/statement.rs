//! Statement handles.

use std::collections::VecDeque;

use serde_json::{Map, Value};
use soql_connect_client::{AuthenticatedTransport, QueryResult};
use tracing::{debug, instrument};

use crate::error::Result;

/// One result row: field name to value, with Salesforce `attributes`
/// metadata removed.
pub type Record = Map<String, Value>;

/// Options for query execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Include deleted and archived records (`queryAll` endpoint).
    pub include_deleted: bool,
    /// Page size hint sent as `Sforce-Query-Options: batchSize=N`.
    pub batch_size: Option<u32>,
}

/// A command bound to an authenticated transport.
///
/// Created by [`Connection::prepare`](crate::Connection::prepare). Each
/// handle has its own result buffer; executing again replaces it.
#[derive(Debug)]
pub struct SoqlStatement {
    transport: AuthenticatedTransport,
    command: String,
    options: QueryOptions,
    executed: bool,
    row_count: u64,
    column_count: usize,
    rows: VecDeque<Record>,
}

impl SoqlStatement {
    /// Bind `command` to `transport`. No request is made.
    pub fn new(transport: AuthenticatedTransport, command: impl Into<String>) -> Self {
        Self {
            transport,
            command: command.into(),
            options: QueryOptions::default(),
            executed: false,
            row_count: 0,
            column_count: 0,
            rows: VecDeque::new(),
        }
    }

    /// Set query options.
    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    /// The command string this handle executes.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// The query options.
    pub fn options(&self) -> QueryOptions {
        self.options
    }

    /// Whether `execute` has completed successfully on this handle.
    pub fn is_executed(&self) -> bool {
        self.executed
    }

    /// Execute the command and buffer every result page.
    ///
    /// Returns the row count reported by the remote side. On failure the
    /// handle is left unexecuted with an empty buffer.
    #[instrument(skip(self), fields(options = ?self.options))]
    pub async fn execute(&mut self) -> Result<u64> {
        self.executed = false;
        self.row_count = 0;
        self.column_count = 0;
        self.rows.clear();

        let result: QueryResult<Record> = self
            .transport
            .query_all(
                &self.command,
                self.options.include_deleted,
                self.options.batch_size,
            )
            .await?;

        self.rows = result
            .records
            .into_iter()
            .map(|mut record| {
                strip_attributes(&mut record);
                record
            })
            .collect();
        self.column_count = self.rows.front().map_or(0, Map::len);
        self.row_count = result.total_size;
        self.executed = true;

        debug!(
            row_count = self.row_count,
            buffered = self.rows.len(),
            "Statement executed"
        );

        Ok(self.row_count)
    }

    /// Number of rows the remote side reported for the last execution.
    ///
    /// This is `totalSize`, which can exceed the number of buffered rows for
    /// aggregate `COUNT()` queries.
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    /// Number of fields in the first row, or 0 without rows.
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Take the next buffered row.
    pub fn fetch(&mut self) -> Option<Record> {
        self.rows.pop_front()
    }

    /// Take every remaining buffered row.
    pub fn fetch_all(&mut self) -> Vec<Record> {
        self.rows.drain(..).collect()
    }

    /// Take the named field from every remaining row.
    pub fn fetch_column(&mut self, field: &str) -> Vec<Value> {
        self.rows
            .drain(..)
            .map(|mut row| row.remove(field).unwrap_or(Value::Null))
            .collect()
    }
}

/// Remove `attributes` objects, including those of nested relationship rows.
fn strip_attributes(record: &mut Record) {
    record.remove("attributes");
    for value in record.values_mut() {
        match value {
            Value::Object(nested) => strip_attributes(nested),
            // Child relationship subqueries come back as a nested query result
            Value::Array(items) => {
                for item in items {
                    if let Value::Object(nested) = item {
                        strip_attributes(nested);
                    }
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soql_connect_client::ClientConfig;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport(uri: &str) -> AuthenticatedTransport {
        AuthenticatedTransport::new(uri, "T", ClientConfig::default()).unwrap()
    }

    #[test]
    fn test_strip_attributes_recursively() {
        let mut record: Record = serde_json::from_value(serde_json::json!({
            "attributes": {"type": "Contact", "url": "/services/data/v62.0/sobjects/Contact/003A"},
            "Id": "003A",
            "Account": {
                "attributes": {"type": "Account"},
                "Name": "Acme"
            },
            "Cases": {
                "totalSize": 1,
                "done": true,
                "records": [{"attributes": {"type": "Case"}, "Subject": "Help"}]
            }
        }))
        .unwrap();

        strip_attributes(&mut record);

        assert_eq!(
            Value::Object(record),
            serde_json::json!({
                "Id": "003A",
                "Account": {"Name": "Acme"},
                "Cases": {"totalSize": 1, "done": true, "records": [{"Subject": "Help"}]}
            })
        );
    }

    #[test]
    fn test_new_statement_is_unexecuted() {
        let stmt = SoqlStatement::new(transport("https://na1.salesforce.com"), "SELECT Id FROM Account");
        assert_eq!(stmt.command(), "SELECT Id FROM Account");
        assert!(!stmt.is_executed());
        assert_eq!(stmt.row_count(), 0);
        assert_eq!(stmt.column_count(), 0);
    }

    #[tokio::test]
    async fn test_execute_and_fetch() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/services/data/v62.0/query"))
            .and(query_param("q", "SELECT Id, Name FROM Account"))
            .and(header("Authorization", "Bearer T"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "totalSize": 2,
                "done": true,
                "records": [
                    {"attributes": {"type": "Account"}, "Id": "001A", "Name": "Acme"},
                    {"attributes": {"type": "Account"}, "Id": "001B", "Name": "Globex"}
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut stmt = SoqlStatement::new(transport(&mock_server.uri()), "SELECT Id, Name FROM Account");
        assert_eq!(stmt.execute().await.unwrap(), 2);
        assert!(stmt.is_executed());
        assert_eq!(stmt.row_count(), 2);
        assert_eq!(stmt.column_count(), 2);

        let first = stmt.fetch().unwrap();
        assert_eq!(first["Name"], "Acme");
        assert!(!first.contains_key("attributes"));

        let rest = stmt.fetch_all();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0]["Id"], "001B");
        assert!(stmt.fetch().is_none());
    }

    #[tokio::test]
    async fn test_query_all_endpoint_and_fetch_column() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/services/data/v62.0/queryAll"))
            .and(header("Sforce-Query-Options", "batchSize=1000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "totalSize": 2,
                "done": true,
                "records": [{"Id": "001A", "IsDeleted": true}, {"Id": "001B"}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut stmt = SoqlStatement::new(transport(&mock_server.uri()), "SELECT Id, IsDeleted FROM Account")
            .with_options(QueryOptions {
                include_deleted: true,
                batch_size: Some(1000),
            });
        stmt.execute().await.unwrap();

        assert_eq!(
            stmt.fetch_column("IsDeleted"),
            vec![Value::Bool(true), Value::Null]
        );
    }

    #[tokio::test]
    async fn test_failed_execution_resets_handle() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/services/data/v62.0/query"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!([{
                "errorCode": "INVALID_TYPE",
                "message": "sObject type 'Acount' is not supported."
            }])))
            .mount(&mock_server)
            .await;

        let mut stmt = SoqlStatement::new(transport(&mock_server.uri()), "SELECT Id FROM Acount");
        let err = stmt.execute().await.unwrap_err();

        assert!(err.is_remote_execution_error());
        assert_eq!(err.remote_state(), Some("INVALID_TYPE"));
        assert_eq!(err.remote_code(), Some(400));
        assert!(!stmt.is_executed());
        assert!(stmt.fetch().is_none());
    }
}
