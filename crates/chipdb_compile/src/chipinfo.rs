//! Decoding of the root record of a linked database.
//!
//! Used by the CLI to sanity-check a fresh image and by the tests to walk
//! the tables without reimplementing the layout.

use chipdb_bba::{BlobReader, ReadError};
use chipdb_common::Location;
use serde::Serialize;

/// Size in bytes of one `GlobalInfoPOD` entry.
const GLOBAL_INFO_SIZE: usize = 4;

/// Header fields and table offsets of a chip database image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChipInfo {
    /// Grid width in tiles.
    pub width: u32,
    /// Grid height in tiles.
    pub height: u32,
    /// Number of grid cells.
    pub num_tiles: u32,
    /// Number of distinct location types.
    pub num_location_types: u32,
    /// Number of packages.
    pub num_packages: u32,
    /// Number of pads with metadata.
    pub num_pios: u32,
    /// Offset of the `LocationTypePOD` array.
    pub locations: usize,
    /// Offset of the per-tile location type table.
    pub location_type: usize,
    /// Offset of the per-tile `GlobalInfoPOD` table.
    pub location_glbinfo: usize,
    /// Offset of the tile type name table.
    pub tiletype_names: usize,
    /// Offset of the `PackageInfoPOD` array.
    pub package_info: usize,
    /// Offset of the `PIOInfoPOD` array.
    pub pio_info: usize,
    /// Offset of the per-tile `TileInfoPOD` array.
    pub tile_info: usize,
}

impl ChipInfo {
    /// Follows the root reference at the start of the image and decodes the
    /// record it points to.
    ///
    /// # Errors
    ///
    /// Fails on truncated images or null table references.
    pub fn read(reader: &BlobReader<'_>) -> Result<Self, ReadError> {
        let root = reader.required_reference(0)?;
        let mut cur = reader.cursor(root);
        let width = cur.next_u32()?;
        let height = cur.next_u32()?;
        let num_tiles = cur.next_u32()?;
        let num_location_types = cur.next_u32()?;
        let num_packages = cur.next_u32()?;
        let num_pios = cur.next_u32()?;

        let mut table = || -> Result<usize, ReadError> {
            let at = cur.position();
            cur.skip(4);
            reader.required_reference(at)
        };
        Ok(Self {
            width,
            height,
            num_tiles,
            num_location_types,
            num_packages,
            num_pios,
            locations: table()?,
            location_type: table()?,
            location_glbinfo: table()?,
            tiletype_names: table()?,
            package_info: table()?,
            pio_info: table()?,
            tile_info: table()?,
        })
    }

    fn cell(&self, loc: Location) -> Option<usize> {
        let in_grid = loc.x >= 0
            && loc.y >= 0
            && (loc.x as u32) < self.width
            && (loc.y as u32) < self.height;
        in_grid.then(|| loc.y as usize * self.width as usize + loc.x as usize)
    }

    /// Location type index stored for `loc`, if it is inside the grid.
    ///
    /// # Errors
    ///
    /// Fails on truncated images.
    pub fn location_type_at(
        &self,
        reader: &BlobReader<'_>,
        loc: Location,
    ) -> Result<Option<u32>, ReadError> {
        match self.cell(loc) {
            Some(i) => reader.u32(self.location_type + 4 * i).map(Some),
            None => Ok(None),
        }
    }

    /// Raw `(tap_col, tap_dir, quad)` stored for `loc`, if it is inside the
    /// grid.
    ///
    /// # Errors
    ///
    /// Fails on truncated images.
    pub fn global_info_at(
        &self,
        reader: &BlobReader<'_>,
        loc: Location,
    ) -> Result<Option<(u16, u8, u8)>, ReadError> {
        let Some(i) = self.cell(loc) else {
            return Ok(None);
        };
        let mut cur = reader.cursor(self.location_glbinfo + GLOBAL_INFO_SIZE * i);
        Ok(Some((cur.next_u16()?, cur.next_u8()?, cur.next_u8()?)))
    }
}
