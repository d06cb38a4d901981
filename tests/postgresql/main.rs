//! PostgreSQL integration tests
//!
//! These tests run against a live server whose connection string is read
//! from `POSTGRESQL_TEST_URL`. When the variable is not set every test
//! returns early. Each test works on its own table, dropping and recreating
//! it first.

mod catalog_test;
mod helpers;
mod types_test;
mod upsert_test;
