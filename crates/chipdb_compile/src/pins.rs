//! Package pin and pad metadata resolution.
//!
//! Every pin names a tile and a pad letter. The pad is found by searching
//! the tile's location type for the bel `PIO<letter>`. Special pads on the
//! bottom row of the device have no I/O bel; those are dropped. A miss on any
//! other row means the pinout and the routing graph disagree, and aborts the
//! run.

use crate::error::CompileError;
use chipdb_common::Location;
use chipdb_trellis::{DeviceProvider, IoDb};

/// A bonded pin of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagePin {
    /// Pin name, e.g. `A4`.
    pub name: String,
    /// Tile of the pad.
    pub loc: Location,
    /// Index of the I/O bel within the tile's location type.
    pub bel_index: u32,
}

/// A package with its resolved pins, sorted by pin name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Package name, e.g. `CABGA381`.
    pub name: String,
    /// Resolved pins.
    pub pins: Vec<PackagePin>,
}

/// Bank and function data of a resolved pad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PioInfo {
    /// Tile of the pad.
    pub loc: Location,
    /// Index of the I/O bel within the tile's location type.
    pub bel_index: u32,
    /// I/O bank.
    pub bank: u16,
    /// Dedicated function, if any.
    pub function: Option<String>,
}

/// Resolved package and pad tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinTables {
    /// Packages sorted by name.
    pub packages: Vec<Package>,
    /// Pads in pinout file order.
    pub pios: Vec<PioInfo>,
    /// Number of bottom-row entries that were dropped.
    pub dropped: usize,
}

/// Finds the bel named `bel` at `loc`.
///
/// Returns `Ok(None)` for a miss on the bottom row.
///
/// # Errors
///
/// Returns [`CompileError::UnresolvedPin`] for a miss on any other row, and
/// provider errors for coordinates outside the grid.
pub fn resolve_bel<P: DeviceProvider + ?Sized>(
    provider: &P,
    loc: Location,
    bel: &str,
) -> Result<Option<u32>, CompileError> {
    let lt = provider.location_type_at(loc)?;
    if let Some(idx) = lt.bels.iter().position(|b| b.name == bel) {
        return Ok(Some(idx as u32));
    }
    if provider.grid().is_bottom_row(loc) {
        Ok(None)
    } else {
        Err(CompileError::UnresolvedPin {
            loc,
            bel: bel.to_string(),
        })
    }
}

impl PinTables {
    /// Resolves every package pin and pad of `iodb`.
    ///
    /// Packages and pins are visited by name, pads in file order.
    ///
    /// # Errors
    ///
    /// Fails on the first pin or pad that cannot be tolerated as missing.
    pub fn resolve<P: DeviceProvider + ?Sized>(
        provider: &P,
        iodb: &IoDb,
    ) -> Result<Self, CompileError> {
        let mut tables = PinTables::default();

        for (pkg_name, pins) in &iodb.packages {
            let mut resolved = Vec::with_capacity(pins.len());
            for (pin_name, pin) in pins {
                match resolve_bel(provider, pin.loc(), &pin.bel_name())? {
                    Some(bel_index) => resolved.push(PackagePin {
                        name: pin_name.clone(),
                        loc: pin.loc(),
                        bel_index,
                    }),
                    None => tables.dropped += 1,
                }
            }
            tables.packages.push(Package {
                name: pkg_name.clone(),
                pins: resolved,
            });
        }

        for meta in &iodb.pio_metadata {
            match resolve_bel(provider, meta.loc(), &meta.bel_name())? {
                Some(bel_index) => tables.pios.push(PioInfo {
                    loc: meta.loc(),
                    bel_index,
                    bank: meta.bank,
                    function: meta.function.clone(),
                }),
                None => tables.dropped += 1,
            }
        }

        Ok(tables)
    }
}
