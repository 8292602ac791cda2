//! Loads the sync settings file into per-table sync specs.

pub mod error;
pub mod settings;

pub use error::ConfigError;
pub use settings::{SyncConfig, TableEntry, load, load_from_str};
