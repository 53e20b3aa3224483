//! Compiler from an ECP5 device description to a binary chip database.
//!
//! A compile run has three stages:
//!
//! 1. [`CompileContext::new`] numbers the location types, collects per-tile
//!    clock metadata, and resolves the package pinouts.
//! 2. [`write_database`] emits the record stream into a
//!    [`BlobAssembler`](chipdb_bba::BlobAssembler).
//! 3. The assembler links the stream into one relocatable image.
//!
//! [`compile`] runs all three and optionally checks every relative
//! reference of the routing graph beforehand.

#![warn(missing_docs)]

pub mod chipinfo;
pub mod context;
pub mod delay;
pub mod error;
pub mod globals;
pub mod loctypes;
pub mod pins;
pub mod verify;
pub mod writer;

#[cfg(test)]
mod testutil;

pub use chipinfo::ChipInfo;
pub use context::CompileContext;
pub use error::CompileError;
pub use loctypes::LocationTypeIndex;
pub use verify::verify_relative_addressing;
pub use writer::write_database;

use chipdb_bba::{Blob, BlobAssembler, Endianness};
use chipdb_common::ContentHash;
use chipdb_config::IdentifierTable;
use chipdb_trellis::{Device, DeviceProvider, IoDb};
use serde::Serialize;

/// Options of a compile run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Byte order of the image.
    pub endianness: Endianness,
    /// Check every relative reference before assembling.
    pub verify: bool,
}

/// Counts describing a finished compile run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileSummary {
    /// Grid width in tiles.
    pub width: u32,
    /// Grid height in tiles.
    pub height: u32,
    /// Distinct location types.
    pub location_types: usize,
    /// Distinct tile type names.
    pub tile_types: usize,
    /// Packages emitted.
    pub packages: usize,
    /// Package pins emitted over all packages.
    pub package_pins: usize,
    /// Pads with metadata emitted.
    pub pios: usize,
    /// Bottom-row pins and pads without an I/O bel.
    pub dropped_pins: usize,
    /// References checked by the verifier, if it ran.
    pub verified_refs: Option<usize>,
    /// Image size in bytes.
    pub image_size: usize,
    /// XXH3-128 digest of the image.
    pub hash: ContentHash,
}

/// Output of a compile run.
#[derive(Debug)]
pub struct ChipDb {
    /// The record stream, kept for the text dump.
    pub assembler: BlobAssembler,
    /// The linked image.
    pub blob: Blob,
    /// Counts for status reporting.
    pub summary: CompileSummary,
}

/// Compiles the database of `device`.
///
/// Nothing is returned unless every stage succeeds.
///
/// # Errors
///
/// Returns the first integrity violation found by any stage.
pub fn compile<P: DeviceProvider + ?Sized>(
    device: Device,
    provider: &P,
    iodb: &IoDb,
    constids: &IdentifierTable,
    options: CompileOptions,
) -> Result<ChipDb, CompileError> {
    let mut ctx = CompileContext::new(device, provider, iodb, constids)?;

    let verified_refs = if options.verify {
        Some(verify_relative_addressing(provider, &ctx.loctypes)?)
    } else {
        None
    };

    let assembler = write_database(&mut ctx)?;
    let blob = assembler.link(options.endianness)?;

    let grid = provider.grid();
    let summary = CompileSummary {
        width: grid.width(),
        height: grid.height(),
        location_types: ctx.loctypes.len(),
        tile_types: ctx.tile_type_names().count(),
        packages: ctx.pins.packages.len(),
        package_pins: ctx.pins.packages.iter().map(|p| p.pins.len()).sum(),
        pios: ctx.pins.pios.len(),
        dropped_pins: ctx.pins.dropped,
        verified_refs,
        image_size: blob.len(),
        hash: ContentHash::from_bytes(blob.bytes()),
    };

    Ok(ChipDb {
        assembler,
        blob,
        summary,
    })
}
