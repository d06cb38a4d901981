//! Insert, merge and no-op behavior of each match strategy.

use crate::helpers::{expected, init_tracing, users_rows, users_store};
use record_source::VecRecordSource;
use table_sink::MemoryStore;
use table_upsert::{
    upsert_records, MatchStrategy, SaveStats, UpsertConfig, UpsertError, UpsertSettings,
};
use text_types::ConverterRegistry;

fn source(rows: &[(&str, &str)]) -> VecRecordSource {
    rows.iter()
        .fold(VecRecordSource::new(["id", "name"]), |source, (id, name)| {
            source.with_values([*id, *name])
        })
}

async fn run(
    store: &MemoryStore,
    strategy: MatchStrategy,
    rows: &[(&str, &str)],
) -> Result<SaveStats, UpsertError> {
    let config = UpsertConfig::new("users", strategy)?;
    upsert_records(
        store,
        &ConverterRegistry::with_defaults(),
        &mut source(rows),
        &config,
    )
    .await
}

#[tokio::test]
async fn test_insert_only_growth() {
    init_tracing();
    let store = users_store(&[]);

    let stats = run(&store, MatchStrategy::InsertOnly, &[("1", "a"), ("2", "b")])
        .await
        .unwrap();

    assert_eq!(stats.inserted(), 2);
    assert_eq!(stats.total(), 2);
    assert_eq!(users_rows(&store), expected(&[(1, "a"), (2, "b")]));
}

#[tokio::test]
async fn test_merge_by_primary_key() {
    init_tracing();
    let store = users_store(&[(1, "a"), (2, "b")]);

    let stats = run(
        &store,
        MatchStrategy::MergeByPrimaryKey,
        &[("1", "a"), ("2", "c"), ("3", "d")],
    )
    .await
    .unwrap();

    assert_eq!(stats.unchanged(), 1);
    assert_eq!(stats.updated(), 1);
    assert_eq!(stats.inserted(), 1);
    assert_eq!(stats.failed(), 0);
    assert_eq!(
        users_rows(&store),
        expected(&[(1, "a"), (2, "c"), (3, "d")])
    );
}

#[tokio::test]
async fn test_merge_by_key_columns() {
    init_tracing();
    let store = users_store(&[(1, "a"), (2, "b")]);

    let stats = run(
        &store,
        MatchStrategy::MergeByKeyColumns(vec!["name".to_string()]),
        &[("3", "a"), ("4", "c")],
    )
    .await
    .unwrap();

    assert_eq!(stats.updated(), 1);
    assert_eq!(stats.inserted(), 1);
    assert_eq!(stats.total(), 2);
    assert_eq!(
        users_rows(&store),
        expected(&[(2, "b"), (3, "a"), (4, "c")])
    );
}

#[tokio::test]
async fn test_second_run_is_unchanged() {
    init_tracing();
    let store = users_store(&[]);
    let rows = [("1", "a"), ("2", "b"), ("3", "c")];

    let first = run(&store, MatchStrategy::MergeByPrimaryKey, &rows)
        .await
        .unwrap();
    assert_eq!(first.inserted(), 3);

    let second = run(&store, MatchStrategy::MergeByPrimaryKey, &rows)
        .await
        .unwrap();
    assert_eq!(second.inserted(), 0);
    assert_eq!(second.updated(), 0);
    assert_eq!(second.unchanged(), 3);
}

#[tokio::test]
async fn test_round_trip_touches_only_changed_row() {
    init_tracing();
    let store = users_store(&[(1, "a"), (2, "x")]);

    let stats = run(&store, MatchStrategy::MergeByPrimaryKey, &[("1", "a")])
        .await
        .unwrap();
    assert_eq!(stats.unchanged(), 1);
    assert_eq!(stats.total(), 1);

    let stats = run(&store, MatchStrategy::MergeByPrimaryKey, &[("1", "b")])
        .await
        .unwrap();
    assert_eq!(stats.updated(), 1);
    assert_eq!(stats.total(), 1);
    assert_eq!(users_rows(&store), expected(&[(1, "b"), (2, "x")]));
}

#[tokio::test]
async fn test_unknown_source_fields_are_ignored() {
    init_tracing();
    let store = users_store(&[(1, "a")]);
    let mut source = VecRecordSource::new(["nickname", "id", "name"])
        .with_values(["al", "1", "a"])
        .with_values(["bo", "2", "b"]);
    let config = UpsertConfig::new("users", MatchStrategy::MergeByPrimaryKey).unwrap();

    let stats = upsert_records(
        &store,
        &ConverterRegistry::with_defaults(),
        &mut source,
        &config,
    )
    .await
    .unwrap();

    assert_eq!(stats.unchanged(), 1);
    assert_eq!(stats.inserted(), 1);
    assert_eq!(users_rows(&store), expected(&[(1, "a"), (2, "b")]));
}

#[tokio::test]
async fn test_dry_run_classifies_without_writing() {
    init_tracing();
    let store = users_store(&[(1, "a"), (2, "b")]);
    let config = UpsertConfig::new("users", MatchStrategy::MergeByPrimaryKey)
        .unwrap()
        .with_dry_run(true);

    let stats = upsert_records(
        &store,
        &ConverterRegistry::with_defaults(),
        &mut source(&[("1", "a"), ("2", "c"), ("3", "d")]),
        &config,
    )
    .await
    .unwrap();

    assert_eq!(stats.unchanged(), 1);
    assert_eq!(stats.updated(), 1);
    assert_eq!(stats.inserted(), 1);
    assert_eq!(users_rows(&store), expected(&[(1, "a"), (2, "b")]));
}

#[tokio::test]
async fn test_empty_key_columns_fail_before_connecting() {
    let store = users_store(&[]);

    let err = UpsertConfig::new("users", MatchStrategy::MergeByKeyColumns(Vec::new())).unwrap_err();
    assert!(err.to_string().contains("at least one key column"));

    let settings = UpsertSettings::from_toml(
        r#"
        table = "users"
        match_strategy = "key_columns"
        "#,
    )
    .unwrap();
    assert!(UpsertConfig::from_settings(&settings).is_err());
    assert_eq!(store.connections_opened(), 0);
}

#[tokio::test]
async fn test_unknown_key_column_fails_before_writes() {
    init_tracing();
    let store = users_store(&[(1, "a")]);

    let err = run(
        &store,
        MatchStrategy::MergeByKeyColumns(vec!["email".to_string()]),
        &[("2", "b")],
    )
    .await
    .unwrap_err();

    match err {
        UpsertError::Configuration(err) => {
            assert_eq!(
                err.problems(),
                &["Key column 'email' not found in table 'users'".to_string()]
            );
        }
        other => panic!("Expected configuration error, got {other:?}"),
    }
    assert_eq!(users_rows(&store), expected(&[(1, "a")]));
    assert_eq!(store.connections_open(), 0);
}

#[tokio::test]
async fn test_table_without_primary_key() {
    use sync_core::{ColumnDefinition, TableDefinition, UniversalType};

    let store = MemoryStore::new();
    store.create_table(TableDefinition::new(
        "events",
        vec![ColumnDefinition::nullable("name", UniversalType::Text)],
    ));
    let config = UpsertConfig::new("events", MatchStrategy::MergeByPrimaryKey).unwrap();
    let mut source = VecRecordSource::new(["name"]).with_values(["started"]);

    let err = upsert_records(
        &store,
        &ConverterRegistry::with_defaults(),
        &mut source,
        &config,
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("has no primary key"));

    let config = UpsertConfig::new("events", MatchStrategy::InsertOnly).unwrap();
    let mut source = VecRecordSource::new(["name"])
        .with_values(["started"])
        .with_values(["started"]);
    let stats = upsert_records(
        &store,
        &ConverterRegistry::with_defaults(),
        &mut source,
        &config,
    )
    .await
    .unwrap();
    assert_eq!(stats.inserted(), 2);
    assert_eq!(store.rows("events").len(), 2);
}

#[tokio::test]
async fn test_no_matching_fields_fails_without_writes() {
    use sync_core::{ColumnDefinition, TableDefinition, UniversalType};

    init_tracing();
    let store = MemoryStore::new();
    store.create_table(TableDefinition::new(
        "events",
        vec![ColumnDefinition::nullable("payload", UniversalType::Text)],
    ));
    let config = UpsertConfig::new("events", MatchStrategy::InsertOnly).unwrap();
    let mut source = VecRecordSource::new(["wrong", "fields"])
        .with_values(["a", "b"])
        .with_values(["c", "d"]);

    let err = upsert_records(
        &store,
        &ConverterRegistry::with_defaults(),
        &mut source,
        &config,
    )
    .await
    .unwrap_err();

    match err {
        UpsertError::Configuration(err) => {
            assert_eq!(
                err.problems(),
                &["No source field matches a column of table 'events'".to_string()]
            );
        }
        other => panic!("Expected configuration error, got {other:?}"),
    }
    assert!(store.rows("events").is_empty());
    assert_eq!(store.connections_open(), 0);
}

#[tokio::test]
async fn test_null_keys_never_match() {
    use sync_core::{ColumnDefinition, TableDefinition, UniversalType};

    init_tracing();
    let store = MemoryStore::new();
    store.create_table(TableDefinition::new(
        "contacts",
        vec![
            ColumnDefinition::new("id", UniversalType::BigInt).primary_key(),
            ColumnDefinition::nullable("email", UniversalType::Text),
        ],
    ));
    let config = UpsertConfig::new(
        "contacts",
        MatchStrategy::MergeByKeyColumns(vec!["email".to_string()]),
    )
    .unwrap();

    let mut source = VecRecordSource::new(["id", "email"])
        .with_row([Some("1"), None])
        .with_row([Some("2"), None])
        .with_row([Some("3"), Some("c@example.com")]);
    let stats = upsert_records(
        &store,
        &ConverterRegistry::with_defaults(),
        &mut source,
        &config,
    )
    .await
    .unwrap();

    assert_eq!(stats.inserted(), 3);
    assert_eq!(store.rows("contacts").len(), 3);
}

#[tokio::test]
async fn test_unknown_table() {
    let store = users_store(&[]);
    let config = UpsertConfig::new("accounts", MatchStrategy::InsertOnly).unwrap();

    let err = upsert_records(
        &store,
        &ConverterRegistry::with_defaults(),
        &mut source(&[("1", "a")]),
        &config,
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "Storage error: Table 'accounts' not found");
    assert_eq!(store.connections_open(), 0);
}
