//! Configuration types deserialized from `chipdb.toml`.

use chipdb_bba::Endianness;
use serde::Deserialize;

/// The top-level compiler configuration parsed from `chipdb.toml`.
///
/// Every section is optional; an empty file is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChipDbConfig {
    /// Where the device database lives.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// How the output image is produced.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Location of the device-description database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DatabaseConfig {
    /// Database root directory, used when neither `--db` nor `TRELLIS_DB`
    /// is given.
    #[serde(default)]
    pub root: Option<String>,
}

/// Output image settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    /// Byte order of scalar fields.
    #[serde(default)]
    pub endianness: Endianness,
    /// Run the relative-addressing verifier before assembly.
    #[serde(default)]
    pub verify: bool,
}
