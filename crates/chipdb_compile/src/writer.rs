//! Emission of the chip database record stream.
//!
//! Records are written in a fixed order: the per-location-type routing
//! graphs, the location-type table, per-tile name lists, the per-tile
//! location type and global tables, package and pad tables, the tile type
//! name table, and finally the root `chip_info` record. All references are
//! by label and may point forward; the assembler resolves them at link time.

use crate::context::CompileContext;
use crate::error::CompileError;
use chipdb_bba::BlobAssembler;
use chipdb_common::Location;
use chipdb_trellis::{DeviceProvider, LocationType};

/// Label of the root record.
pub const ROOT_LABEL: &str = "chip_info";

/// Assembles the complete record stream for `ctx`.
///
/// # Errors
///
/// Fails on unknown identifiers, unresolvable wire references, or an
/// oversized tile type table.
pub fn write_database<P: DeviceProvider + ?Sized>(
    ctx: &mut CompileContext<'_, P>,
) -> Result<BlobAssembler, CompileError> {
    let mut bba = BlobAssembler::new();
    bba.pre("#include \"nextpnr.h\"");
    bba.pre("NEXTPNR_NAMESPACE_BEGIN");
    bba.post("NEXTPNR_NAMESPACE_END");
    bba.push(format!("chipdb_blob_{}", ctx.device.name()));
    bba.reference(Some(ROOT_LABEL.to_string()), "chip_info");

    let provider = ctx.provider;
    let mut loctypes = Vec::with_capacity(ctx.loctypes.len());
    for key in ctx.loctypes.keys() {
        loctypes.push(provider.location_type(key)?);
    }

    for (idx, lt) in loctypes.iter().enumerate() {
        write_location_type(&mut bba, ctx, idx, lt)?;
    }

    bba.label("locations", Some("LocationTypePOD"));
    for (idx, lt) in loctypes.iter().enumerate() {
        bba.u32(lt.bels.len() as u32, "num_bels");
        bba.u32(lt.wires.len() as u32, "num_wires");
        bba.u32(lt.arcs.len() as u32, "num_pips");
        bba.reference(non_empty(&lt.bels, || format!("loc{idx}_bels")), "bel_data");
        bba.reference(non_empty(&lt.wires, || format!("loc{idx}_wires")), "wire_data");
        bba.reference(non_empty(&lt.arcs, || format!("loc{idx}_pips")), "pips_data");
    }

    write_tiles(&mut bba, ctx)?;
    write_grid_tables(&mut bba, ctx);
    write_pins(&mut bba, ctx);

    bba.label("tiletype_names", Some("RelPtr<char>"));
    for name in ctx.tile_type_names() {
        bba.string(name, "name");
    }

    write_chip_info(&mut bba, ctx, loctypes.len());
    bba.pop();
    Ok(bba)
}

fn non_empty<T>(items: &[T], label: impl FnOnce() -> String) -> Option<String> {
    if items.is_empty() {
        None
    } else {
        Some(label())
    }
}

fn write_loc(bba: &mut BlobAssembler, loc: Location, x: &'static str, y: &'static str) {
    bba.u16(loc.x_u16(), x);
    bba.u16(loc.y_u16(), y);
}

fn write_location_type<P: DeviceProvider + ?Sized>(
    bba: &mut BlobAssembler,
    ctx: &mut CompileContext<'_, P>,
    idx: usize,
    lt: &LocationType,
) -> Result<(), CompileError> {
    if !lt.arcs.is_empty() {
        bba.label(format!("loc{idx}_pips"), Some("PipInfoPOD"));
        for arc in &lt.arcs {
            write_loc(bba, arc.src_wire.rel, "src.x", "src.y");
            write_loc(bba, arc.sink_wire.rel, "dst.x", "dst.y");
            bba.u32(arc.src_wire.id, "src_idx");
            bba.u32(arc.sink_wire.id, "dst_idx");
            bba.u32(ctx.arc_delay(idx, arc.src_wire, arc.sink_wire)?, "delay");
            bba.u16(ctx.tile_type_index(&arc.tiletype)?, "tile_type");
            bba.u8(arc.cls, "pip_type");
            bba.u8(0, "padding");
        }
    }

    if !lt.wires.is_empty() {
        for (w, wire) in lt.wires.iter().enumerate() {
            if !wire.arcs_downhill.is_empty() {
                bba.label(format!("loc{idx}_wire{w}_downpips"), Some("PipLocatorPOD"));
                for dp in &wire.arcs_downhill {
                    write_loc(bba, dp.rel, "rel_loc.x", "rel_loc.y");
                    bba.u32(dp.id, "index");
                }
            }
            if !wire.arcs_uphill.is_empty() {
                bba.label(format!("loc{idx}_wire{w}_uppips"), Some("PipLocatorPOD"));
                for up in &wire.arcs_uphill {
                    write_loc(bba, up.rel, "rel_loc.x", "rel_loc.y");
                    bba.u32(up.id, "index");
                }
            }
            if !wire.bel_pins.is_empty() {
                bba.label(format!("loc{idx}_wire{w}_belpins"), Some("BelPortPOD"));
                for bp in &wire.bel_pins {
                    write_loc(bba, bp.bel.rel, "rel_bel_loc.x", "rel_bel_loc.y");
                    bba.u32(bp.bel.id, "bel_index");
                    bba.u32(ctx.constids.code(&bp.pin)?, "port");
                }
            }
        }

        bba.label(format!("loc{idx}_wires"), Some("WireInfoPOD"));
        for (w, wire) in lt.wires.iter().enumerate() {
            bba.string(wire.name.as_str(), "name");
            bba.u32(wire.arcs_uphill.len() as u32, "num_uphill");
            bba.u32(wire.arcs_downhill.len() as u32, "num_downhill");
            bba.reference(
                non_empty(&wire.arcs_uphill, || format!("loc{idx}_wire{w}_uppips")),
                "pips_uphill",
            );
            bba.reference(
                non_empty(&wire.arcs_downhill, || format!("loc{idx}_wire{w}_downpips")),
                "pips_downhill",
            );
            bba.u32(wire.bel_pins.len() as u32, "num_bel_pins");
            bba.reference(
                non_empty(&wire.bel_pins, || format!("loc{idx}_wire{w}_belpins")),
                "bel_pins",
            );
        }
    }

    if !lt.bels.is_empty() {
        for (b, bel) in lt.bels.iter().enumerate() {
            bba.label(format!("loc{idx}_bel{b}_wires"), Some("BelWirePOD"));
            for pin in &bel.wires {
                write_loc(bba, pin.wire.rel, "rel_wire_loc.x", "rel_wire_loc.y");
                bba.u32(pin.wire.id, "wire_index");
                bba.u32(ctx.constids.code(&pin.pin)?, "port");
                bba.u32(pin.dir.code(), "dir");
            }
        }

        bba.label(format!("loc{idx}_bels"), Some("BelInfoPOD"));
        for (b, bel) in lt.bels.iter().enumerate() {
            bba.string(bel.name.as_str(), "name");
            bba.u32(ctx.constids.code(&bel.bel_type)?, "type");
            bba.u32(bel.z, "z");
            bba.u32(bel.wires.len() as u32, "num_bel_wires");
            bba.reference(Some(format!("loc{idx}_bel{b}_wires")), "bel_wires");
        }
    }
    Ok(())
}

fn write_tiles<P: DeviceProvider + ?Sized>(
    bba: &mut BlobAssembler,
    ctx: &mut CompileContext<'_, P>,
) -> Result<(), CompileError> {
    let provider = ctx.provider;
    let grid = provider.grid();

    for loc in grid.locations() {
        bba.label(format!("tile_info_{}_{}", loc.x, loc.y), Some("TileNamePOD"));
        for tile in provider.tiles_at(loc) {
            bba.string(tile.name.as_str(), "name");
            bba.u16(ctx.tile_type_index(&tile.tile_type)?, "type_idx");
            bba.u16(0, "padding");
        }
    }

    bba.label("tiles_info", Some("TileInfoPOD"));
    for loc in grid.locations() {
        bba.u32(provider.tiles_at(loc).len() as u32, "num_tiles");
        bba.reference(Some(format!("tile_info_{}_{}", loc.x, loc.y)), "tile_names");
    }
    Ok(())
}

fn write_grid_tables<P: DeviceProvider + ?Sized>(
    bba: &mut BlobAssembler,
    ctx: &CompileContext<'_, P>,
) {
    bba.label("location_types", Some("int32_t"));
    for &lt in ctx.loctypes.type_table() {
        bba.u32(lt, "loctype");
    }

    bba.label("location_glbinfo", Some("GlobalInfoPOD"));
    for info in ctx.globals.entries() {
        bba.u16(info.tap_driver.col, "tap_col");
        bba.u8(info.tap_driver.dir.code(), "tap_dir");
        bba.u8(info.quadrant.code(), "quad");
    }
}

fn write_pins<P: DeviceProvider + ?Sized>(bba: &mut BlobAssembler, ctx: &CompileContext<'_, P>) {
    for package in &ctx.pins.packages {
        bba.label(format!("package_data_{}", package.name), Some("PackagePinPOD"));
        for pin in &package.pins {
            bba.string(pin.name.as_str(), "name");
            write_loc(bba, pin.loc, "abs_loc.x", "abs_loc.y");
            bba.u32(pin.bel_index, "bel_index");
        }
    }

    bba.label("package_data", Some("PackageInfoPOD"));
    for package in &ctx.pins.packages {
        bba.string(package.name.as_str(), "name");
        bba.u32(package.pins.len() as u32, "num_pins");
        bba.reference(Some(format!("package_data_{}", package.name)), "pin_data");
    }

    bba.label("pio_info", Some("PIOInfoPOD"));
    for pio in &ctx.pins.pios {
        write_loc(bba, pio.loc, "abs_loc.x", "abs_loc.y");
        bba.u32(pio.bel_index, "bel_index");
        match &pio.function {
            Some(func) => bba.string(func.as_str(), "function_name"),
            None => bba.reference(None, "function_name"),
        }
        bba.u16(pio.bank, "bank");
        bba.u16(0, "padding");
    }
}

fn write_chip_info<P: DeviceProvider + ?Sized>(
    bba: &mut BlobAssembler,
    ctx: &CompileContext<'_, P>,
    num_location_types: usize,
) {
    let grid = ctx.provider.grid();
    bba.label(ROOT_LABEL, None);
    bba.u32(grid.width(), "width");
    bba.u32(grid.height(), "height");
    bba.u32(grid.num_tiles() as u32, "num_tiles");
    bba.u32(num_location_types as u32, "num_location_types");
    bba.u32(ctx.pins.packages.len() as u32, "num_packages");
    bba.u32(ctx.pins.pios.len() as u32, "num_pios");

    for (target, tag) in [
        ("locations", "locations"),
        ("location_types", "location_type"),
        ("location_glbinfo", "location_glbinfo"),
        ("tiletype_names", "tiletype_names"),
        ("package_data", "package_info"),
        ("pio_info", "pio_info"),
        ("tiles_info", "tile_info"),
    ] {
        bba.reference(Some(target.to_string()), tag);
    }
}
