//! In-memory provider for unit tests.

use chipdb_common::{Grid, Location};
use chipdb_trellis::{
    Arc, Bel, BelWire, DeviceProvider, GlobalInfo, LocTypeKey, LocationType, PortDirection,
    ProviderError, Quadrant, RelId, TapDirection, TapDriver, TileInfo, Wire,
};
use std::collections::HashMap;

/// Grid of location-type keys with optional routing graphs and tiles.
///
/// Keys without a registered graph resolve to an empty location type.
/// Global data is derived from the coordinate: quadrant by half of the grid,
/// tap column equal to x.
pub(crate) struct FakeProvider {
    grid: Grid,
    keys: Vec<LocTypeKey>,
    types: HashMap<LocTypeKey, LocationType>,
    tiles: Vec<Vec<TileInfo>>,
}

impl FakeProvider {
    pub(crate) fn from_rows(rows: &[&[&str]]) -> Self {
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, |r| r.len()) as i32;
        let grid = Grid::new(width - 1, height - 1);
        let keys: Vec<LocTypeKey> = rows
            .iter()
            .flat_map(|r| r.iter().map(|k| LocTypeKey::new(*k)))
            .collect();
        let types = keys
            .iter()
            .map(|k| (k.clone(), LocationType::default()))
            .collect();
        Self {
            grid,
            tiles: vec![Vec::new(); keys.len()],
            keys,
            types,
        }
    }

    pub(crate) fn with_type(mut self, key: &str, lt: LocationType) -> Self {
        self.types.insert(LocTypeKey::new(key), lt);
        self
    }

    pub(crate) fn with_tile(mut self, x: i32, y: i32, name: &str, tile_type: &str) -> Self {
        let idx = self.grid.index_of(Location::new(x, y)).unwrap();
        self.tiles[idx].push(TileInfo {
            name: name.to_string(),
            tile_type: tile_type.to_string(),
        });
        self
    }
}

impl DeviceProvider for FakeProvider {
    fn grid(&self) -> Grid {
        self.grid
    }

    fn type_key_at(&self, loc: Location) -> Result<&LocTypeKey, ProviderError> {
        self.grid
            .index_of(loc)
            .map(|i| &self.keys[i])
            .ok_or(ProviderError::OutsideGrid(loc))
    }

    fn location_type(&self, key: &LocTypeKey) -> Result<&LocationType, ProviderError> {
        self.types
            .get(key)
            .ok_or_else(|| ProviderError::UnknownLocationType(key.clone()))
    }

    fn tiles_at(&self, loc: Location) -> &[TileInfo] {
        match self.grid.index_of(loc) {
            Some(i) => &self.tiles[i],
            None => &[],
        }
    }

    fn global_info(&self, loc: Location) -> Result<GlobalInfo, ProviderError> {
        if !self.grid.contains(loc) {
            return Err(ProviderError::OutsideGrid(loc));
        }
        let left = loc.x * 2 <= self.grid.max_col;
        let upper = loc.y * 2 <= self.grid.max_row;
        let quadrant = match (upper, left) {
            (true, true) => Quadrant::UL,
            (true, false) => Quadrant::UR,
            (false, true) => Quadrant::LL,
            (false, false) => Quadrant::LR,
        };
        Ok(GlobalInfo {
            quadrant,
            tap_driver: TapDriver {
                dir: if left {
                    TapDirection::Left
                } else {
                    TapDirection::Right
                },
                col: loc.x as u16,
            },
        })
    }
}

pub(crate) fn wire(name: &str) -> Wire {
    Wire {
        name: name.to_string(),
        arcs_uphill: Vec::new(),
        arcs_downhill: Vec::new(),
        bel_pins: Vec::new(),
    }
}

pub(crate) fn arc(src: RelId, sink: RelId, tiletype: &str) -> Arc {
    Arc {
        src_wire: src,
        sink_wire: sink,
        tiletype: tiletype.to_string(),
        cls: 0,
    }
}

pub(crate) fn bel(name: &str, bel_type: &str, z: u32, pins: &[(&str, u32, PortDirection)]) -> Bel {
    Bel {
        name: name.to_string(),
        bel_type: bel_type.to_string(),
        z,
        wires: pins
            .iter()
            .map(|&(pin, w, dir)| BelWire {
                wire: RelId::local(w),
                pin: pin.to_string(),
                dir,
            })
            .collect(),
    }
}

/// A location type holding a single I/O bel per pad letter.
pub(crate) fn pio_type(letters: &[&str]) -> LocationType {
    LocationType {
        bels: letters
            .iter()
            .enumerate()
            .map(|(z, l)| bel(&format!("PIO{l}"), "TRELLIS_IO", z as u32, &[]))
            .collect(),
        ..LocationType::default()
    }
}
