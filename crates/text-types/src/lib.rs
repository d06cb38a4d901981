//! String conversions for sync-core types.
//!
//! Record sources deliver every field as an optional string. This crate turns
//! those strings into [`sync_core::UniversalValue`]s typed after the target
//! column, so that incoming values can be compared with stored ones.
//!
//! # Modules
//!
//! - [`registry`] - Type-keyed converter lookup with pass-through fallback
//! - [`reverse`] - Per-type string → UniversalValue parse functions
//!
//! # Example
//!
//! ```rust
//! use sync_core::{UniversalType, UniversalValue};
//! use text_types::ConverterRegistry;
//!
//! let registry = ConverterRegistry::with_defaults();
//! let int = registry.converter_for(UniversalType::Int);
//! assert_eq!(int.convert(Some("42")).unwrap(), UniversalValue::Int32(42));
//! assert!(int.convert(None).unwrap().is_null());
//! ```

pub mod registry;
pub mod reverse;

pub use registry::{ConverterRegistry, FieldConverter, ParseFn};
pub use reverse::ConversionError;
