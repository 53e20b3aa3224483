//! Device-description provider for Lattice ECP5 chip databases.
//!
//! The chip database compiler never inspects raw bitstream documentation.
//! Instead it queries a [`DeviceProvider`]: a read-only oracle that knows the
//! tile grid, the deduplicated routing graph at every coordinate, the sub-tile
//! names, and the global clock tap metadata. Package pinouts come from the
//! separate [`IoDb`] table.
//!
//! # Database files
//!
//! [`TrellisDatabase`] loads both from a Project Trellis style database
//! directory:
//!
//! ```text
//! <db_root>/
//! └── ECP5/
//!     └── LFE5U-25F/
//!         ├── dedup_chipdb.json
//!         └── iodb.json
//! ```
//!
//! Point `TRELLIS_DB` to the database root, pass `--db`, or set
//! `database.root` in `chipdb.toml`.

#![warn(missing_docs)]

pub mod chipdb;
pub mod db;
pub mod device;
pub mod error;
pub mod iodb;
pub mod types;

pub use chipdb::DedupChipDb;
pub use db::{device_dir, resolve_db_root, TrellisDatabase, DB_ENV_VAR};
pub use device::Device;
pub use error::ProviderError;
pub use iodb::{IoDb, PinLocation, PioMetadata};
pub use types::{
    Arc, Bel, BelPin, BelWire, GlobalInfo, LocTypeKey, LocationType, PortDirection, Quadrant,
    RelId, TapDirection, TapDriver, TileInfo, Wire,
};

use chipdb_common::{Grid, Location};

/// Read-only view of a device's deduplicated routing graph.
///
/// Identity of location types is decided here, not by the compiler: two
/// coordinates are the same location type exactly when the provider returns
/// equal keys for them.
pub trait DeviceProvider {
    /// Bounds of the tile grid.
    fn grid(&self) -> Grid;

    /// Key of the location type at an in-grid coordinate.
    ///
    /// # Errors
    ///
    /// Fails for coordinates outside the grid.
    fn type_key_at(&self, loc: Location) -> Result<&LocTypeKey, ProviderError>;

    /// The routing graph shape identified by `key`.
    ///
    /// # Errors
    ///
    /// Fails if the key is unknown to the provider.
    fn location_type(&self, key: &LocTypeKey) -> Result<&LocationType, ProviderError>;

    /// Named sub-tiles hosted by the grid cell at `loc`, in provider order.
    ///
    /// Cells outside the grid host no tiles.
    fn tiles_at(&self, loc: Location) -> &[TileInfo];

    /// Clock quadrant and tap driver of the cell at `loc`.
    ///
    /// # Errors
    ///
    /// Fails for coordinates outside the grid.
    fn global_info(&self, loc: Location) -> Result<GlobalInfo, ProviderError>;

    /// Largest valid row index.
    fn max_row(&self) -> i32 {
        self.grid().max_row
    }

    /// Largest valid column index.
    fn max_col(&self) -> i32 {
        self.grid().max_col
    }

    /// Convenience lookup of the location type at a coordinate.
    fn location_type_at(&self, loc: Location) -> Result<&LocationType, ProviderError> {
        let key = self.type_key_at(loc)?;
        self.location_type(key)
    }
}
