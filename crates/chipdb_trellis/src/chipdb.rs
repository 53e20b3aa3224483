//! In-memory deduplicated chip database loaded from `dedup_chipdb.json`.
//!
//! The file is a dump of the deduplicated routing graph produced by the
//! device-description tooling:
//!
//! ```text
//! {
//!   "max_row": 71, "max_col": 126,
//!   "location_types": { "<key>": { "wires": [...], "arcs": [...], "bels": [...] } },
//!   "type_at_location": [ { "x": 0, "y": 0, "type": "<key>" }, ... ],
//!   "tiles": [ { "x": 0, "y": 0, "name": "R0C0:EFB0_PICB0", "type": "EFB0_PICB0" }, ... ],
//!   "global_data": [ { "x": 0, "y": 0, "quadrant": "UL", "tap_dir": "LEFT", "tap_col": 5 }, ... ]
//! }
//! ```
//!
//! Entries at the global sentinel coordinate are accepted and ignored. Every
//! in-grid coordinate must have exactly one location type and one global
//! entry.

use crate::error::ProviderError;
use crate::types::{
    GlobalInfo, LocTypeKey, LocationType, Quadrant, TapDirection, TapDriver, TileInfo,
};
use crate::DeviceProvider;
use chipdb_common::{Grid, Location};
use serde::Deserialize;
use std::collections::HashMap;

/// A fully validated, deduplicated device description.
#[derive(Debug, Clone)]
pub struct DedupChipDb {
    grid: Grid,
    location_types: HashMap<LocTypeKey, LocationType>,
    type_at: Vec<LocTypeKey>,
    tiles: Vec<Vec<TileInfo>>,
    globals: Vec<GlobalInfo>,
}

#[derive(Deserialize)]
struct RawTypeAt {
    x: i32,
    y: i32,
    #[serde(rename = "type")]
    key: LocTypeKey,
}

#[derive(Deserialize)]
struct RawTile {
    x: i32,
    y: i32,
    name: String,
    #[serde(rename = "type")]
    tile_type: String,
}

#[derive(Deserialize)]
struct RawGlobal {
    x: i32,
    y: i32,
    quadrant: Quadrant,
    tap_dir: TapDirection,
    tap_col: u16,
}

#[derive(Deserialize)]
struct RawChipDb {
    max_row: i32,
    max_col: i32,
    location_types: HashMap<LocTypeKey, LocationType>,
    type_at_location: Vec<RawTypeAt>,
    #[serde(default)]
    tiles: Vec<RawTile>,
    global_data: Vec<RawGlobal>,
}

impl DedupChipDb {
    /// Builds a database from per-coordinate tables.
    ///
    /// # Errors
    ///
    /// Fails if an entry lies outside the grid (other than the global
    /// sentinel), refers to an unknown location type, duplicates another
    /// entry, or if any in-grid coordinate lacks a location type or global
    /// entry.
    pub fn new(
        grid: Grid,
        location_types: HashMap<LocTypeKey, LocationType>,
        type_at: impl IntoIterator<Item = (Location, LocTypeKey)>,
        tiles: impl IntoIterator<Item = (Location, TileInfo)>,
        globals: impl IntoIterator<Item = (Location, GlobalInfo)>,
    ) -> Result<Self, ProviderError> {
        let n = grid.num_tiles();

        let mut type_slots: Vec<Option<LocTypeKey>> = vec![None; n];
        for (loc, key) in type_at {
            let Some(idx) = slot(&grid, loc)? else {
                continue;
            };
            if !location_types.contains_key(&key) {
                return Err(ProviderError::UnknownLocationType(key));
            }
            if type_slots[idx].replace(key).is_some() {
                return Err(ProviderError::DuplicateData {
                    loc,
                    what: "location type",
                });
            }
        }

        let mut tile_slots: Vec<Vec<TileInfo>> = vec![Vec::new(); n];
        for (loc, tile) in tiles {
            if let Some(idx) = slot(&grid, loc)? {
                tile_slots[idx].push(tile);
            }
        }

        let mut global_slots: Vec<Option<GlobalInfo>> = vec![None; n];
        for (loc, info) in globals {
            let Some(idx) = slot(&grid, loc)? else {
                continue;
            };
            if global_slots[idx].replace(info).is_some() {
                return Err(ProviderError::DuplicateData {
                    loc,
                    what: "global data",
                });
            }
        }

        let type_at = grid
            .locations()
            .zip(type_slots)
            .map(|(loc, key)| {
                key.ok_or(ProviderError::MissingData {
                    loc,
                    what: "location type",
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let globals = grid
            .locations()
            .zip(global_slots)
            .map(|(loc, info)| {
                info.ok_or(ProviderError::MissingData {
                    loc,
                    what: "global data",
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            grid,
            location_types,
            type_at,
            tiles: tile_slots,
            globals,
        })
    }

    /// Parses and validates the contents of a `dedup_chipdb.json` file.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Parse`] for malformed JSON and the errors of
    /// [`DedupChipDb::new`] for inconsistent tables.
    pub fn from_json(json: &str) -> Result<Self, ProviderError> {
        let raw: RawChipDb = serde_json::from_str(json).map_err(|e| ProviderError::Parse {
            file: "dedup_chipdb.json".to_string(),
            message: e.to_string(),
        })?;

        Self::new(
            Grid::new(raw.max_col, raw.max_row),
            raw.location_types,
            raw.type_at_location
                .into_iter()
                .map(|t| (Location::new(t.x, t.y), t.key)),
            raw.tiles.into_iter().map(|t| {
                (
                    Location::new(t.x, t.y),
                    TileInfo {
                        name: t.name,
                        tile_type: t.tile_type,
                    },
                )
            }),
            raw.global_data.into_iter().map(|g| {
                (
                    Location::new(g.x, g.y),
                    GlobalInfo {
                        quadrant: g.quadrant,
                        tap_driver: TapDriver {
                            dir: g.tap_dir,
                            col: g.tap_col,
                        },
                    },
                )
            }),
        )
    }

    /// Number of distinct routing graph shapes known to the provider.
    pub fn location_type_count(&self) -> usize {
        self.location_types.len()
    }
}

/// Row-major slot of an entry; `None` for the global sentinel.
fn slot(grid: &Grid, loc: Location) -> Result<Option<usize>, ProviderError> {
    if loc.is_global() {
        return Ok(None);
    }
    grid.index_of(loc)
        .map(Some)
        .ok_or(ProviderError::OutsideGrid(loc))
}

impl DeviceProvider for DedupChipDb {
    fn grid(&self) -> Grid {
        self.grid
    }

    fn type_key_at(&self, loc: Location) -> Result<&LocTypeKey, ProviderError> {
        self.grid
            .index_of(loc)
            .map(|i| &self.type_at[i])
            .ok_or(ProviderError::OutsideGrid(loc))
    }

    fn location_type(&self, key: &LocTypeKey) -> Result<&LocationType, ProviderError> {
        self.location_types
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
        self.grid
            .index_of(loc)
            .map(|i| self.globals[i])
            .ok_or(ProviderError::OutsideGrid(loc))
    }
}
