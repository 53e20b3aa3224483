//! Inputs of a chip database compile run besides the device description.
//!
//! Two files are handled here:
//!
//! - `chipdb.toml`, an optional [`ChipDbConfig`] with the database root and
//!   output options
//! - `constids.inc`, the required [`IdentifierTable`] mapping bel type and
//!   port names to the integer codes stored in the database

#![warn(missing_docs)]

pub mod constids;
pub mod error;
pub mod loader;
pub mod types;

pub use constids::IdentifierTable;
pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, load_config_or_default, DEFAULT_CONFIG_FILE};
pub use types::*;
