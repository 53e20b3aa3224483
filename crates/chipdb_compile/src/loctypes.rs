//! Location-type numbering.
//!
//! The provider decides which coordinates share a routing graph shape. This
//! module only assigns each distinct shape a dense index, in the order the
//! shapes are first seen during a row-major walk of the grid (y outer,
//! x inner), and records a per-coordinate index table.
//!
//! Each shape also gets a representative coordinate: the last coordinate of
//! the walk that carries it. Wire names for pip delays are resolved there.

use chipdb_common::{Grid, Location};
use chipdb_trellis::{DeviceProvider, LocTypeKey, ProviderError};
use std::collections::HashMap;

/// Dense numbering of the location types of a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationTypeIndex {
    grid: Grid,
    keys: Vec<LocTypeKey>,
    representatives: Vec<Location>,
    type_at: Vec<u32>,
}

impl LocationTypeIndex {
    /// Walks the grid once and numbers every distinct location type.
    ///
    /// # Errors
    ///
    /// Propagates provider lookup failures.
    pub fn build<P: DeviceProvider + ?Sized>(provider: &P) -> Result<Self, ProviderError> {
        let grid = provider.grid();
        let mut seen: HashMap<LocTypeKey, u32> = HashMap::new();
        let mut keys = Vec::new();
        let mut representatives = Vec::new();
        let mut type_at = Vec::with_capacity(grid.num_tiles());

        for loc in grid.locations() {
            let key = provider.type_key_at(loc)?;
            let idx = match seen.get(key) {
                Some(&idx) => {
                    representatives[idx as usize] = loc;
                    idx
                }
                None => {
                    let idx = keys.len() as u32;
                    seen.insert(key.clone(), idx);
                    keys.push(key.clone());
                    representatives.push(loc);
                    idx
                }
            };
            type_at.push(idx);
        }

        Ok(Self {
            grid,
            keys,
            representatives,
            type_at,
        })
    }

    /// Number of distinct location types.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` for an empty grid.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Provider keys in index order.
    pub fn keys(&self) -> &[LocTypeKey] {
        &self.keys
    }

    /// Provider key of location type `idx`.
    pub fn key(&self, idx: usize) -> &LocTypeKey {
        &self.keys[idx]
    }

    /// Last coordinate of the row-major walk carrying location type `idx`.
    pub fn representative(&self, idx: usize) -> Location {
        self.representatives[idx]
    }

    /// Location type index of an in-grid coordinate.
    pub fn index_at(&self, loc: Location) -> Option<u32> {
        self.grid.index_of(loc).map(|i| self.type_at[i])
    }

    /// Per-coordinate location type indices in row-major order.
    pub fn type_table(&self) -> &[u32] {
        &self.type_at
    }

    /// Bounds of the indexed grid.
    pub fn grid(&self) -> Grid {
        self.grid
    }
}
