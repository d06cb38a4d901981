//! Match strategies and batch semantics against PostgreSQL.

use crate::helpers::{connect, expected, id_name_rows, recreate_table};
use record_source::VecRecordSource;
use table_sink::{BatchSemantics, StorageError};
use table_upsert::{upsert_records, MatchStrategy, UpsertConfig, UpsertError};
use text_types::ConverterRegistry;
use tokio_postgres::Client;

const USERS: &str = "id INTEGER PRIMARY KEY, name TEXT";

fn source(rows: &[(&str, &str)]) -> VecRecordSource {
    rows.iter()
        .fold(VecRecordSource::new(["id", "name"]), |source, (id, name)| {
            source.with_values([*id, *name])
        })
}

async fn seed(client: &Client, table: &str, rows: &[(i32, &str)]) {
    for (id, name) in rows {
        client
            .execute(
                &format!("INSERT INTO {table} (id, name) VALUES ($1, $2)"),
                &[id, name],
            )
            .await
            .expect("Failed to seed row");
    }
}

#[tokio::test]
async fn test_postgresql_merge_by_primary_key() {
    let Some((provider, client)) = connect().await else {
        return;
    };
    let table = "upsert_pg_merge_pk";
    recreate_table(&client, table, USERS).await;
    seed(&client, table, &[(1, "a"), (2, "b")]).await;

    let config = UpsertConfig::new(table, MatchStrategy::MergeByPrimaryKey).unwrap();
    let registry = ConverterRegistry::with_defaults();
    let rows = [("1", "a"), ("2", "c"), ("3", "d")];

    let stats = upsert_records(&provider, &registry, &mut source(&rows), &config)
        .await
        .unwrap();
    assert_eq!(stats.unchanged(), 1);
    assert_eq!(stats.updated(), 1);
    assert_eq!(stats.inserted(), 1);
    assert_eq!(
        id_name_rows(&client, table).await,
        expected(&[(1, "a"), (2, "c"), (3, "d")])
    );

    let stats = upsert_records(&provider, &registry, &mut source(&rows), &config)
        .await
        .unwrap();
    assert_eq!(stats.unchanged(), 3);
    assert_eq!(stats.total(), 3);
}

#[tokio::test]
async fn test_postgresql_insert_only() {
    let Some((provider, client)) = connect().await else {
        return;
    };
    let table = "upsert_pg_insert_only";
    recreate_table(&client, table, USERS).await;

    let config = UpsertConfig::new(table, MatchStrategy::InsertOnly).unwrap();
    let stats = upsert_records(
        &provider,
        &ConverterRegistry::with_defaults(),
        &mut source(&[("1", "a"), ("2", "b")]),
        &config,
    )
    .await
    .unwrap();

    assert_eq!(stats.inserted(), 2);
    assert_eq!(
        id_name_rows(&client, table).await,
        expected(&[(1, "a"), (2, "b")])
    );
}

#[tokio::test]
async fn test_postgresql_merge_by_key_columns() {
    let Some((provider, client)) = connect().await else {
        return;
    };
    let table = "upsert_pg_key_columns";
    recreate_table(&client, table, USERS).await;
    seed(&client, table, &[(1, "a"), (2, "b")]).await;

    let config = UpsertConfig::new(
        table,
        MatchStrategy::MergeByKeyColumns(vec!["name".to_string()]),
    )
    .unwrap();
    let stats = upsert_records(
        &provider,
        &ConverterRegistry::with_defaults(),
        &mut source(&[("3", "a"), ("4", "c")]),
        &config,
    )
    .await
    .unwrap();

    assert_eq!(stats.updated(), 1);
    assert_eq!(stats.inserted(), 1);
    assert_eq!(
        id_name_rows(&client, table).await,
        expected(&[(2, "b"), (3, "a"), (4, "c")])
    );
}

#[tokio::test]
async fn test_postgresql_row_independent_failure() {
    let Some((provider, client)) = connect().await else {
        return;
    };
    let table = "upsert_pg_row_failure";
    recreate_table(&client, table, "id INTEGER PRIMARY KEY, name TEXT NOT NULL").await;

    let mut source = VecRecordSource::new(["id", "name"])
        .with_values(["1", "a"])
        .with_row([Some("2"), None])
        .with_values(["3", "c"]);
    let config = UpsertConfig::new(table, MatchStrategy::InsertOnly).unwrap();

    let stats = upsert_records(
        &provider,
        &ConverterRegistry::with_defaults(),
        &mut source,
        &config,
    )
    .await
    .unwrap();

    assert_eq!(stats.inserted(), 2);
    assert_eq!(stats.failed(), 1);
    assert_eq!(stats.failures()[0].row_index, 1);
    assert!(matches!(
        stats.failures()[0].error,
        StorageError::Rejected(_)
    ));
    assert_eq!(
        id_name_rows(&client, table).await,
        expected(&[(1, "a"), (3, "c")])
    );
}

#[tokio::test]
async fn test_postgresql_atomic_rollback() {
    let Some((provider, client)) = connect().await else {
        return;
    };
    let table = "upsert_pg_atomic";
    recreate_table(&client, table, USERS).await;
    seed(&client, table, &[(1, "a")]).await;

    let config = UpsertConfig::new(table, MatchStrategy::InsertOnly)
        .unwrap()
        .with_semantics(BatchSemantics::Atomic);
    let err = upsert_records(
        &provider,
        &ConverterRegistry::with_defaults(),
        &mut source(&[("2", "b"), ("1", "duplicate")]),
        &config,
    )
    .await
    .unwrap_err();

    assert!(
        matches!(err, UpsertError::Storage(StorageError::Rejected(_))),
        "{err:?}"
    );
    assert_eq!(id_name_rows(&client, table).await, expected(&[(1, "a")]));
}

#[tokio::test]
async fn test_postgresql_schema_qualified_table() {
    let Some((provider, client)) = connect().await else {
        return;
    };
    client
        .batch_execute("CREATE SCHEMA IF NOT EXISTS upsert_test")
        .await
        .unwrap();
    let table = "upsert_test.people";
    recreate_table(&client, table, USERS).await;

    let config = UpsertConfig::new(table, MatchStrategy::MergeByPrimaryKey).unwrap();
    let stats = upsert_records(
        &provider,
        &ConverterRegistry::with_defaults(),
        &mut source(&[("1", "a")]),
        &config,
    )
    .await
    .unwrap();

    assert_eq!(stats.inserted(), 1);
    assert_eq!(id_name_rows(&client, table).await, expected(&[(1, "a")]));
}
