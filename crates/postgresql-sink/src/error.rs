//! Classification of PostgreSQL errors.

use table_sink::StorageError;

/// Map a client error onto the store error kinds.
///
/// Data exceptions (SQLSTATE class 22) and integrity constraint violations
/// (class 23) concern a single row. Connection exceptions (class 08),
/// operator intervention (57P) and closed connections are connectivity
/// failures. Everything else is a statement failure.
pub fn classify(err: tokio_postgres::Error) -> StorageError {
    if let Some(db_error) = err.as_db_error() {
        let code = db_error.code().code();
        let message = format!("{} (SQLSTATE {code})", db_error.message());
        return classify_sqlstate(code, message);
    }
    if err.is_closed() {
        return StorageError::Connection(err.to_string());
    }
    StorageError::Statement(err.to_string())
}

fn classify_sqlstate(code: &str, message: String) -> StorageError {
    match code.get(..2) {
        Some("22") | Some("23") => StorageError::Rejected(message),
        Some("08") => StorageError::Connection(message),
        _ if code.starts_with("57P") => StorageError::Connection(message),
        _ => StorageError::Statement(message),
    }
}
