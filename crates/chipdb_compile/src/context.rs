//! Tables shared by every stage of a compile run.
//!
//! [`CompileContext`] is built once from the provider and pinout, then handed
//! to the writer. It owns the location-type numbering, the global tap table,
//! the resolved pin tables, and the tile-type name table; nothing else
//! mutates them.

use crate::error::CompileError;
use crate::globals::GlobalTapTable;
use crate::loctypes::LocationTypeIndex;
use crate::pins::PinTables;
use chipdb_common::Interner;
use chipdb_config::IdentifierTable;
use chipdb_trellis::{Device, DeviceProvider, IoDb, RelId, Wire};

/// State of one compile run.
pub struct CompileContext<'a, P: DeviceProvider + ?Sized> {
    /// Target device.
    pub device: Device,
    /// Source of the routing graph.
    pub provider: &'a P,
    /// Bel type and port codes.
    pub constids: &'a IdentifierTable,
    /// Location-type numbering.
    pub loctypes: LocationTypeIndex,
    /// Per-tile clock metadata.
    pub globals: GlobalTapTable,
    /// Resolved packages and pads.
    pub pins: PinTables,
    tile_types: Interner,
}

impl<'a, P: DeviceProvider + ?Sized> CompileContext<'a, P> {
    /// Builds every table the writer needs.
    ///
    /// # Errors
    ///
    /// Fails if the identifier table lacks its aliases, if the provider
    /// cannot answer a query, or if a pin cannot be resolved.
    pub fn new(
        device: Device,
        provider: &'a P,
        iodb: &IoDb,
        constids: &'a IdentifierTable,
    ) -> Result<Self, CompileError> {
        constids.require_aliases()?;
        let loctypes = LocationTypeIndex::build(provider)?;
        let globals = GlobalTapTable::collect(provider)?;
        let pins = PinTables::resolve(provider, iodb)?;
        Ok(Self {
            device,
            provider,
            constids,
            loctypes,
            globals,
            pins,
            tile_types: Interner::new(),
        })
    }

    /// Index of a tile type name, interning it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::TooManyTileTypes`] once the table outgrows a
    /// 16-bit index.
    pub fn tile_type_index(&mut self, name: &str) -> Result<u16, CompileError> {
        let raw = self.tile_types.get_or_intern(name).as_raw();
        u16::try_from(raw).map_err(|_| CompileError::TooManyTileTypes(self.tile_types.len()))
    }

    /// Interned tile type names in index order.
    pub fn tile_type_names(&self) -> impl Iterator<Item = &str> {
        self.tile_types.iter().map(|(_, name)| name)
    }

    /// Resolves a wire reference of location type `lt` against that type's
    /// representative coordinate.
    ///
    /// # Errors
    ///
    /// Fails if the reference leaves the grid or names a missing wire.
    pub fn wire(&self, lt: usize, wire: RelId) -> Result<&'a Wire, CompileError> {
        let from = self.loctypes.representative(lt);
        let loc = from.offset(wire.rel);
        if !self.provider.grid().contains(loc) {
            return Err(CompileError::OutsideGrid {
                from,
                rel: wire.rel,
                what: "wire",
            });
        }
        let wires = &self.provider.location_type_at(loc)?.wires;
        wires
            .get(wire.id as usize)
            .ok_or(CompileError::IndexOutOfRange {
                loc,
                index: wire.id,
                count: wires.len(),
                what: "wire",
            })
    }

    /// Delay estimate of arc `arc` of location type `lt`.
    ///
    /// # Errors
    ///
    /// Fails if either end of the arc cannot be resolved.
    pub fn arc_delay(&self, lt: usize, src: RelId, sink: RelId) -> Result<u32, CompileError> {
        let from = self.wire(lt, src)?;
        let to = self.wire(lt, sink)?;
        Ok(crate::delay::pip_delay(&from.name, &to.name))
    }
}
