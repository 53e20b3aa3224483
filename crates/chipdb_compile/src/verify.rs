//! Relative-addressing checks over the provider's routing graph.
//!
//! Every wire, arc, and bel reference in a location type is relative to the
//! coordinate that uses it. Since one location type is shared by many
//! coordinates, a reference that is fine at one of them may leave the grid or
//! land on a location type without the referenced item at another. This pass
//! resolves every reference at every coordinate.

use crate::error::CompileError;
use crate::loctypes::LocationTypeIndex;
use chipdb_common::Location;
use chipdb_trellis::{DeviceProvider, LocationType, RelId};

/// Checks every relative reference of every coordinate.
///
/// Returns the number of references checked.
///
/// # Errors
///
/// Returns [`CompileError::OutsideGrid`] or [`CompileError::IndexOutOfRange`]
/// for the first broken reference.
pub fn verify_relative_addressing<P: DeviceProvider + ?Sized>(
    provider: &P,
    index: &LocationTypeIndex,
) -> Result<usize, CompileError> {
    let mut types = Vec::with_capacity(index.len());
    for key in index.keys() {
        types.push(provider.location_type(key)?);
    }
    let checker = Checker {
        index,
        types: &types,
    };

    let mut checked = 0;
    for loc in index.grid().locations() {
        let Some(lt) = index.index_at(loc) else {
            continue;
        };
        let lt = types[lt as usize];

        for wire in &lt.wires {
            for &r in wire.arcs_uphill.iter().chain(&wire.arcs_downhill) {
                checker.check(loc, r, "arc", |t| t.arcs.len())?;
            }
            for bp in &wire.bel_pins {
                checker.check(loc, bp.bel, "bel", |t| t.bels.len())?;
            }
            checked += wire.arcs_uphill.len() + wire.arcs_downhill.len() + wire.bel_pins.len();
        }
        for arc in &lt.arcs {
            checker.check(loc, arc.src_wire, "wire", |t| t.wires.len())?;
            checker.check(loc, arc.sink_wire, "wire", |t| t.wires.len())?;
            checked += 2;
        }
        for bel in &lt.bels {
            for pin in &bel.wires {
                checker.check(loc, pin.wire, "wire", |t| t.wires.len())?;
            }
            checked += bel.wires.len();
        }
    }
    Ok(checked)
}

struct Checker<'a> {
    index: &'a LocationTypeIndex,
    types: &'a [&'a LocationType],
}

impl Checker<'_> {
    fn check(
        &self,
        from: Location,
        r: RelId,
        what: &'static str,
        count: impl Fn(&LocationType) -> usize,
    ) -> Result<(), CompileError> {
        let loc = from.offset(r.rel);
        let Some(target) = self.index.index_at(loc) else {
            return Err(CompileError::OutsideGrid {
                from,
                rel: r.rel,
                what,
            });
        };
        let available = count(self.types[target as usize]);
        if (r.id as usize) < available {
            Ok(())
        } else {
            Err(CompileError::IndexOutOfRange {
                loc,
                index: r.id,
                count: available,
                what,
            })
        }
    }
}
