//! Typed conversion and comparison for each supported column type.

use crate::helpers::{connect, recreate_table};
use chrono::NaiveDate;
use record_source::VecRecordSource;
use table_upsert::{upsert_records, MatchStrategy, UpsertConfig};
use text_types::ConverterRegistry;

const TABLE: &str = "upsert_pg_types";

const COLUMNS: &str = "id BIGINT PRIMARY KEY, flag BOOLEAN, small SMALLINT, ratio REAL, \
     score DOUBLE PRECISION, amount NUMERIC(10, 2), token UUID, born DATE, alarm TIME, \
     created TIMESTAMP, seen TIMESTAMPTZ, doc JSONB, span INTERVAL, label VARCHAR(20)";

const FIELDS: [&str; 14] = [
    "id", "flag", "small", "ratio", "score", "amount", "token", "born", "alarm", "created", "seen",
    "doc", "span", "label",
];

#[tokio::test]
async fn test_postgresql_typed_values_round_trip() {
    let Some((provider, client)) = connect().await else {
        return;
    };
    recreate_table(&client, TABLE, COLUMNS).await;

    let config = UpsertConfig::new(TABLE, MatchStrategy::MergeByPrimaryKey).unwrap();
    let registry = ConverterRegistry::with_defaults();

    let mut first = VecRecordSource::new(FIELDS).with_values([
        "1",
        "yes",
        "7",
        "0.25",
        "2.5",
        "1.5",
        "67E55044-10B1-426F-9247-BB680E5FE0C8",
        "2024-02-29",
        "08:30",
        "2024-01-02 03:04:05.5",
        "2024-01-02T03:04:05+02:00",
        r#"{"b": 1, "a": [1, 2]}"#,
        "1 day 02:00:00",
        "first",
    ]);
    let stats = upsert_records(&provider, &registry, &mut first, &config)
        .await
        .unwrap();
    assert_eq!(stats.inserted(), 1);

    // Same values, different spelling
    let mut second = VecRecordSource::new(FIELDS).with_values([
        "001",
        "true",
        "07",
        "0.250",
        "2.50",
        "1.50",
        "67e55044-10b1-426f-9247-bb680e5fe0c8",
        "2024-02-29",
        "08:30:00",
        "2024-01-02T03:04:05.500",
        "2024-01-02T01:04:05Z",
        r#"{"a":[1,2],"b":1}"#,
        "1 day 02:00:00",
        "first",
    ]);
    let stats = upsert_records(&provider, &registry, &mut second, &config)
        .await
        .unwrap();
    assert_eq!(stats.unchanged(), 1, "{stats}");
    assert_eq!(stats.total(), 1);

    let row = client
        .query_one(
            &format!("SELECT amount::text, born, doc, token::text FROM {TABLE} WHERE id = 1"),
            &[],
        )
        .await
        .unwrap();
    let amount: String = row.get(0);
    let born: NaiveDate = row.get(1);
    let doc: serde_json::Value = row.get(2);
    let token: String = row.get(3);
    assert_eq!(amount, "1.50");
    assert_eq!(born, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    assert_eq!(doc, serde_json::json!({"a": [1, 2], "b": 1}));
    assert_eq!(token, "67e55044-10b1-426f-9247-bb680e5fe0c8");
}

#[tokio::test]
async fn test_postgresql_nulls_and_partial_updates() {
    let Some((provider, client)) = connect().await else {
        return;
    };
    let table = "upsert_pg_partial";
    recreate_table(
        &client,
        table,
        "id BIGINT PRIMARY KEY, name TEXT, note TEXT DEFAULT 'kept', span INTERVAL",
    )
    .await;

    let config = UpsertConfig::new(table, MatchStrategy::MergeByPrimaryKey).unwrap();
    let registry = ConverterRegistry::with_defaults();

    let mut first = VecRecordSource::new(["id", "name", "span"]).with_row([
        Some("1"),
        Some("a"),
        None,
    ]);
    let stats = upsert_records(&provider, &registry, &mut first, &config)
        .await
        .unwrap();
    assert_eq!(stats.inserted(), 1);

    // Only the fields present in the batch are set
    let mut second = VecRecordSource::new(["id", "span"]).with_values(["1", "02:00:00"]);
    let stats = upsert_records(&provider, &registry, &mut second, &config)
        .await
        .unwrap();
    assert_eq!(stats.updated(), 1);

    let row = client
        .query_one(
            &format!("SELECT name, note, span::text FROM {table} WHERE id = 1"),
            &[],
        )
        .await
        .unwrap();
    let name: Option<String> = row.get(0);
    let note: Option<String> = row.get(1);
    let span: Option<String> = row.get(2);
    assert_eq!(name.as_deref(), Some("a"));
    assert_eq!(note.as_deref(), Some("kept"));
    assert_eq!(span.as_deref(), Some("02:00:00"));
}
