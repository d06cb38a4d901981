//! Forward conversion: UniversalValue → PostgreSQL parameter
//!
//! This module converts sync-core values into boxed `ToSql` parameters for
//! INSERT, UPDATE and lookup statements.

use bytes::BytesMut;
use postgres_types::{to_sql_checked, IsNull, ToSql, Type};
use std::error::Error;
use sync_core::UniversalValue;

/// A NULL parameter accepted for any column type.
///
/// `None::<T>` would be rejected by the type check of `T` before the value is
/// even looked at.
#[derive(Debug, Clone, Copy)]
pub struct SqlNull;

impl ToSql for SqlNull {
    fn to_sql(&self, _ty: &Type, _out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        Ok(IsNull::Yes)
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

/// Convert a UniversalValue to a boxed ToSql trait object.
///
/// Strings bind as `text`; statements cast them when the column has another
/// type.
pub fn to_sql_param(value: &UniversalValue) -> Box<dyn ToSql + Sync + Send> {
    match value {
        UniversalValue::Null => Box::new(SqlNull),
        UniversalValue::Bool(b) => Box::new(*b),
        UniversalValue::Int16(i) => Box::new(*i),
        UniversalValue::Int32(i) => Box::new(*i),
        UniversalValue::Int64(i) => Box::new(*i),
        UniversalValue::Float32(f) => Box::new(*f),
        UniversalValue::Float64(f) => Box::new(*f),
        UniversalValue::Decimal(d) => Box::new(*d),
        UniversalValue::String(s) => Box::new(s.clone()),
        UniversalValue::Uuid(u) => Box::new(*u),
        UniversalValue::Date(d) => Box::new(*d),
        UniversalValue::Time(t) => Box::new(*t),
        UniversalValue::DateTime(dt) => Box::new(*dt),
        UniversalValue::TimestampTz(dt) => Box::new(*dt),
        UniversalValue::Json(j) => Box::new(j.clone()),
    }
}

/// Borrow boxed parameters as the slice `tokio-postgres` expects.
pub fn param_refs(params: &[Box<dyn ToSql + Sync + Send>]) -> Vec<&(dyn ToSql + Sync)> {
    params
        .iter()
        .map(|p| p.as_ref() as &(dyn ToSql + Sync))
        .collect()
}
