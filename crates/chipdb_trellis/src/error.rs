//! Error types for loading and querying device descriptions.

use crate::types::LocTypeKey;
use chipdb_common::Location;
use std::path::PathBuf;

/// Errors raised by a device-description provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// A database file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A database file is not valid JSON of the expected shape.
    #[error("failed to parse {file}: {message}")]
    Parse {
        /// Short name of the file.
        file: String,
        /// Parser message.
        message: String,
    },

    /// The database directory for a device does not exist.
    #[error("device database directory not found: {0}")]
    DatabaseNotFound(PathBuf),

    /// The device name is not one of the supported devices.
    #[error("unknown device '{0}' (expected one of: 25k, 45k, 85k)")]
    UnknownDevice(String),

    /// A query referred to a coordinate outside the tile grid.
    #[error("location {0} is outside the device grid")]
    OutsideGrid(Location),

    /// A location type key has no routing graph.
    #[error("unknown location type '{0}'")]
    UnknownLocationType(LocTypeKey),

    /// A grid cell lacks required data.
    #[error("no {what} for location {loc}")]
    MissingData {
        /// The grid cell.
        loc: Location,
        /// Which table is incomplete.
        what: &'static str,
    },

    /// A grid cell is described twice.
    #[error("duplicate {what} for location {loc}")]
    DuplicateData {
        /// The grid cell.
        loc: Location,
        /// Which table holds the duplicate.
        what: &'static str,
    },
}
