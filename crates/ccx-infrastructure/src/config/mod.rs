//! Configuration types and loading

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{IndexerConfig, LoggingConfig};
