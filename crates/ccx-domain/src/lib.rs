//! Domain layer for CCX
//!
//! Pure business types for the semantic code-context indexer: entities,
//! value objects, the error model, process-wide constants and the provider
//! ports. This crate has no I/O and no runtime dependencies beyond
//! serialization and async trait support.

pub mod constants;
pub mod entities;
pub mod error;
pub mod language;
pub mod ports;
pub mod value_objects;

pub use error::{Error, Result};
