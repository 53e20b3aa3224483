//! Per-tile clock quadrant and tap driver table.

use chipdb_common::{Grid, Location};
use chipdb_trellis::{DeviceProvider, GlobalInfo, ProviderError};

/// Global clock metadata for every grid coordinate, in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalTapTable {
    grid: Grid,
    entries: Vec<GlobalInfo>,
}

impl GlobalTapTable {
    /// Queries the provider once per coordinate.
    ///
    /// # Errors
    ///
    /// Propagates provider lookup failures.
    pub fn collect<P: DeviceProvider + ?Sized>(provider: &P) -> Result<Self, ProviderError> {
        let grid = provider.grid();
        let entries = grid
            .locations()
            .map(|loc| provider.global_info(loc))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { grid, entries })
    }

    /// Entries in row-major order.
    pub fn entries(&self) -> &[GlobalInfo] {
        &self.entries
    }

    /// Entry of an in-grid coordinate.
    pub fn get(&self, loc: Location) -> Option<&GlobalInfo> {
        self.grid.index_of(loc).map(|i| &self.entries[i])
    }
}
