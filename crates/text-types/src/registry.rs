//! Converter registry keyed by target column type.

use crate::reverse::{self, ConversionError};
use std::collections::HashMap;
use sync_core::{UniversalType, UniversalValue};

/// Parse function for a non-null raw string.
pub type ParseFn = fn(&str) -> Result<UniversalValue, ConversionError>;

/// Converts raw string values for one target type.
///
/// A converter without a parse function is the pass-through converter: it
/// returns the raw string unchanged as [`UniversalValue::String`].
#[derive(Debug, Clone, Copy)]
pub struct FieldConverter {
    target_type: UniversalType,
    parse: Option<ParseFn>,
}

impl FieldConverter {
    pub fn new(target_type: UniversalType, parse: ParseFn) -> Self {
        Self {
            target_type,
            parse: Some(parse),
        }
    }

    pub fn passthrough(target_type: UniversalType) -> Self {
        Self {
            target_type,
            parse: None,
        }
    }

    pub fn target_type(&self) -> UniversalType {
        self.target_type
    }

    pub fn is_passthrough(&self) -> bool {
        self.parse.is_none()
    }

    /// Convert a raw value. `None` becomes [`UniversalValue::Null`] without
    /// invoking the parse function.
    pub fn convert(&self, raw: Option<&str>) -> Result<UniversalValue, ConversionError> {
        let Some(value) = raw else {
            return Ok(UniversalValue::Null);
        };
        match self.parse {
            Some(parse) => parse(value),
            None => Ok(UniversalValue::String(value.to_string())),
        }
    }
}

/// Maps target types to parse functions.
///
/// Construct once, then share by reference across operations. Lookups never
/// fail: unregistered types get a pass-through converter.
#[derive(Debug, Clone)]
pub struct ConverterRegistry {
    converters: HashMap<UniversalType, ParseFn>,
}

impl ConverterRegistry {
    /// A registry without any parse functions.
    pub fn empty() -> Self {
        Self {
            converters: HashMap::new(),
        }
    }

    /// A registry with the built-in converters for every type except
    /// [`UniversalType::Other`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(UniversalType::Bool, reverse::parse_bool);
        registry.register(UniversalType::SmallInt, reverse::parse_small_int);
        registry.register(UniversalType::Int, reverse::parse_int);
        registry.register(UniversalType::BigInt, reverse::parse_big_int);
        registry.register(UniversalType::Float, reverse::parse_float);
        registry.register(UniversalType::Double, reverse::parse_double);
        registry.register(UniversalType::Decimal, reverse::parse_decimal);
        registry.register(UniversalType::Text, reverse::parse_text);
        registry.register(UniversalType::Uuid, reverse::parse_uuid);
        registry.register(UniversalType::Date, reverse::parse_date);
        registry.register(UniversalType::Time, reverse::parse_time);
        registry.register(UniversalType::DateTime, reverse::parse_date_time);
        registry.register(UniversalType::TimestampTz, reverse::parse_timestamp_tz);
        registry.register(UniversalType::Json, reverse::parse_json);
        registry
    }

    /// Register a parse function, returning the one it replaces.
    pub fn register(&mut self, target_type: UniversalType, parse: ParseFn) -> Option<ParseFn> {
        self.converters.insert(target_type, parse)
    }

    pub fn is_registered(&self, target_type: UniversalType) -> bool {
        self.converters.contains_key(&target_type)
    }

    /// Get the converter for a target type.
    pub fn converter_for(&self, target_type: UniversalType) -> FieldConverter {
        match self.converters.get(&target_type) {
            Some(parse) => FieldConverter::new(target_type, *parse),
            None => FieldConverter::passthrough(target_type),
        }
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
