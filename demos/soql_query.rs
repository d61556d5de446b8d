//! Connect with the password grant and run a few queries.
//!
//! Required environment:
//!   SF_INSTANCE_URL, SF_CONSUMER_KEY, SF_CONSUMER_SECRET, SF_USERNAME, SF_PASSWORD
//! Optional:
//!   SF_API_VERSION, SF_TRANSACTION_MODE (emulated | strict | reject), RUST_LOG
//!
//! Run with: cargo run --example soql_query

use soql_connect::{Connection, ConnectionParams, SoqlConnection};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== SOQL Connection Example ===\n");

    let params = ConnectionParams::from_env()?;
    let username = std::env::var("SF_USERNAME")?;
    let password = std::env::var("SF_PASSWORD")?;

    let mut conn = SoqlConnection::connect(params, username, password).await?;
    println!("Connected to {} (API v{})", conn.instance_url(), conn.api_version());

    // Count without reading rows
    let accounts = conn.exec("SELECT COUNT() FROM Account").await?;
    println!("Accounts: {accounts}");

    // Values are escaped and quoted before they go into a command
    let last_name = conn.quote("O'Brien");
    let mut stmt = conn
        .query(&format!(
            "SELECT Id, FirstName, LastName FROM Contact WHERE LastName = {last_name} LIMIT 5"
        ))
        .await?;
    println!("\nContacts named O'Brien: {}", stmt.row_count());
    while let Some(row) = stmt.fetch() {
        println!("  {} {} {}", row["Id"], row["FirstName"], row["LastName"]);
    }

    // Failures leave a diagnostic on the connection
    if let Err(e) = conn.exec("SELECT Id FORM Account").await {
        println!("\nExpected failure: {e}");
        println!("  error_code: {:?}", conn.error_code());
        println!("  error_info: {:?}", conn.error_info());
    }

    // Emulated transactions: nothing is atomic
    conn.begin_transaction()?;
    conn.exec("SELECT Id FROM Account LIMIT 1").await?;
    println!("\nrollBack reported: {}", conn.roll_back()?);

    conn.close().await;
    println!("\n=== Example Complete ===");
    Ok(())
}
