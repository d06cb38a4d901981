//! Connection and table setup for PostgreSQL tests.

use postgresql_sink::PostgreSQLProvider;
use tokio_postgres::{Client, NoTls};

/// Provider and admin client for the test server, or `None` when
/// `POSTGRESQL_TEST_URL` is not set.
pub async fn connect() -> Option<(PostgreSQLProvider, Client)> {
    let Ok(connection_string) = std::env::var("POSTGRESQL_TEST_URL") else {
        eprintln!("POSTGRESQL_TEST_URL not set, skipping");
        return None;
    };

    tracing_subscriber::fmt()
        .with_env_filter("table_upsert=debug,postgresql_sink=debug")
        .try_init()
        .ok();

    let (client, connection) = tokio_postgres::connect(&connection_string, NoTls)
        .await
        .expect("Failed to connect to PostgreSQL");

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("PostgreSQL connection error: {e}");
        }
    });

    Some((PostgreSQLProvider::new(connection_string), client))
}

/// Drop and recreate a table.
pub async fn recreate_table(client: &Client, name: &str, columns: &str) {
    client
        .batch_execute(&format!(
            "DROP TABLE IF EXISTS {name} CASCADE; CREATE TABLE {name} ({columns})"
        ))
        .await
        .expect("Failed to create test table");
}

/// `(id, name)` pairs of a table, ordered by id.
pub async fn id_name_rows(client: &Client, table: &str) -> Vec<(i32, Option<String>)> {
    client
        .query(&format!("SELECT id, name FROM {table} ORDER BY id"), &[])
        .await
        .expect("Failed to query test table")
        .iter()
        .map(|row| (row.get(0), row.get(1)))
        .collect()
}

pub fn expected(rows: &[(i32, &str)]) -> Vec<(i32, Option<String>)> {
    rows.iter()
        .map(|(id, name)| (*id, Some(name.to_string())))
        .collect()
}
