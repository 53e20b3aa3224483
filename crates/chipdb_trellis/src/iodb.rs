//! Package pinout and per-pin metadata loaded from `iodb.json`.
//!
//! ```text
//! {
//!   "packages": {
//!     "CABGA381": { "A4": { "col": 6, "row": 0, "pio": "A" }, ... }
//!   },
//!   "pio_metadata": [
//!     { "col": 0, "row": 11, "pio": "A", "bank": 7, "function": "PCLKT7_0" },
//!     ...
//!   ]
//! }
//! ```
//!
//! Packages and pins are held in sorted maps so iteration is always by name.
//! Metadata entries keep file order.

use crate::error::ProviderError;
use chipdb_common::Location;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Grid position and pad letter of a package pin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinLocation {
    /// Column of the hosting tile.
    pub col: i32,
    /// Row of the hosting tile.
    pub row: i32,
    /// Pad letter within the tile, e.g. `A`.
    pub pio: String,
}

impl PinLocation {
    /// Absolute tile coordinate of the pin.
    pub fn loc(&self) -> Location {
        Location::new(self.col, self.row)
    }

    /// Name of the I/O bel implementing the pin, e.g. `PIOA`.
    pub fn bel_name(&self) -> String {
        format!("PIO{}", self.pio)
    }
}

/// Device-wide bank and function data of one I/O pad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PioMetadata {
    /// Column of the hosting tile.
    pub col: i32,
    /// Row of the hosting tile.
    pub row: i32,
    /// Pad letter within the tile.
    pub pio: String,
    /// I/O bank number.
    pub bank: u16,
    /// Dedicated function, e.g. `PCLKT0_0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
}

impl PioMetadata {
    /// Absolute tile coordinate of the pad.
    pub fn loc(&self) -> Location {
        Location::new(self.col, self.row)
    }

    /// Name of the I/O bel implementing the pad.
    pub fn bel_name(&self) -> String {
        format!("PIO{}", self.pio)
    }
}

/// Package pinouts and pad metadata of a device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoDb {
    /// Pin tables keyed by package name, then pin name.
    pub packages: BTreeMap<String, BTreeMap<String, PinLocation>>,
    /// Per-pad metadata in file order.
    #[serde(default)]
    pub pio_metadata: Vec<PioMetadata>,
}

impl IoDb {
    /// Parses the contents of an `iodb.json` file.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Parse`] for malformed input.
    pub fn from_json(json: &str) -> Result<Self, ProviderError> {
        serde_json::from_str(json).map_err(|e| ProviderError::Parse {
            file: "iodb.json".to_string(),
            message: e.to_string(),
        })
    }

    /// Package names in sorted order.
    pub fn package_names(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }
}
