//! Native value types of target table columns.
//!
//! This module defines `UniversalType`, the closed set of value types the
//! engine knows how to normalize. Every target column is tagged with one of
//! these when its table metadata is loaded from the database catalog.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Native value type of a target column.
///
/// `UniversalType` is the key of the converter registry: each tag selects the
/// string parser that turns a raw record value into a [`UniversalValue`]
/// comparable with what the database stores.
///
/// Columns whose catalog type has no dedicated tag are mapped to
/// [`UniversalType::Other`]; their values pass through as strings.
///
/// # Serialized form
///
/// Types serialize as snake_case strings:
/// ```yaml
/// type: big_int
/// type: date_time
/// type: other
/// ```
///
/// [`UniversalValue`]: crate::UniversalValue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UniversalType {
    /// Boolean value
    Bool,

    /// 16-bit signed integer
    #[serde(alias = "smallint")]
    SmallInt,

    /// 32-bit signed integer
    Int,

    /// 64-bit signed integer
    #[serde(alias = "bigint")]
    BigInt,

    /// 32-bit IEEE 754 floating point
    Float,

    /// 64-bit IEEE 754 floating point
    Double,

    /// Exact decimal
    Decimal,

    /// Character string (text, varchar)
    Text,

    /// UUID (128-bit)
    Uuid,

    /// Calendar date (YYYY-MM-DD)
    Date,

    /// Time of day without timezone
    Time,

    /// Date and time without timezone
    #[serde(alias = "datetime")]
    DateTime,

    /// Date and time with timezone
    #[serde(alias = "timestamptz")]
    TimestampTz,

    /// JSON document (json or jsonb)
    Json,

    /// Any type without a dedicated tag
    Other,
}

impl UniversalType {
    /// All type tags, in declaration order.
    pub const ALL: [UniversalType; 15] = [
        Self::Bool,
        Self::SmallInt,
        Self::Int,
        Self::BigInt,
        Self::Float,
        Self::Double,
        Self::Decimal,
        Self::Text,
        Self::Uuid,
        Self::Date,
        Self::Time,
        Self::DateTime,
        Self::TimestampTz,
        Self::Json,
        Self::Other,
    ];

    /// The snake_case name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::SmallInt => "small_int",
            Self::Int => "int",
            Self::BigInt => "big_int",
            Self::Float => "float",
            Self::Double => "double",
            Self::Decimal => "decimal",
            Self::Text => "text",
            Self::Uuid => "uuid",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "date_time",
            Self::TimestampTz => "timestamp_tz",
            Self::Json => "json",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for UniversalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
