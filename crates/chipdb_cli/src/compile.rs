//! The compile command: load, compile, and write the database.
//!
//! Every output file is written only after the whole compile has succeeded,
//! so a failed run leaves no partial database behind.

use std::path::{Path, PathBuf};

use chipdb_bba::Endianness;
use chipdb_compile::{ChipInfo, CompileOptions};
use chipdb_config::{load_config_or_default, ChipDbConfig, IdentifierTable};
use chipdb_trellis::{resolve_db_root, Device, DeviceProvider, TrellisDatabase};

use crate::{Cli, GlobalArgs};

/// Runs a compile.
///
/// Returns exit code 0 on success.
pub fn run(cli: &Cli, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let config = load_config_or_default(global.config.as_deref(), &cwd)?;
    let device = Device::from(cli.device);

    let db_root = resolve_db_root(cli.db.as_deref(), config.database.root.as_deref()).ok_or(
        "no device database: pass --db, set TRELLIS_DB, or set database.root in chipdb.toml",
    )?;

    if !global.quiet {
        eprintln!(
            "   Loading {} from {}",
            device.part_name(),
            db_root.display()
        );
    }
    let db = TrellisDatabase::load(&db_root, device)?;
    let constids = IdentifierTable::load(&cli.constids)?;

    if global.verbose {
        let grid = db.chipdb.grid();
        eprintln!(
            "      Grid {}x{}, {} location types in database",
            grid.width(),
            grid.height(),
            db.chipdb.location_type_count()
        );
        eprintln!(
            "      Pinout {} packages, {} pads",
            db.iodb.packages.len(),
            db.iodb.pio_metadata.len()
        );
        eprintln!("      Identifiers {}", constids.declared());
    }

    let options = compile_options(cli, &config);
    let chipdb = chipdb_compile::compile(device, &db.chipdb, &db.iodb, &constids, options)?;
    let summary = &chipdb.summary;

    let info = ChipInfo::read(&chipdb.blob.reader())?;
    if info.num_tiles as usize != db.chipdb.grid().num_tiles() {
        return Err(format!(
            "image self-check failed: {} tiles in header, {} in grid",
            info.num_tiles,
            db.chipdb.grid().num_tiles()
        )
        .into());
    }

    if global.verbose {
        if let Some(refs) = summary.verified_refs {
            eprintln!("      Verified {refs} relative references");
        }
        eprintln!(
            "      Emitted {} location types, {} tile types",
            summary.location_types, summary.tile_types
        );
        eprintln!(
            "      Emitted {} packages ({} pins), {} pads, dropped {} bottom-row entries",
            summary.packages, summary.package_pins, summary.pios, summary.dropped_pins
        );
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output(device));
    write(&output, chipdb.blob.bytes())?;
    if let Some(path) = &cli.dump {
        write(path, chipdb.assembler.text().to_string().as_bytes())?;
    }
    if let Some(path) = &cli.layout {
        let json = serde_json::to_string_pretty(&chipdb.blob.layout())?;
        write(path, json.as_bytes())?;
    }

    if !global.quiet {
        eprintln!(
            "    Wrote {} ({} bytes, {})",
            output.display(),
            summary.image_size,
            options.endianness
        );
    }
    if global.verbose {
        eprintln!("      Hash {}", summary.hash);
    }

    Ok(0)
}

/// Command-line flags win over the configuration file.
fn compile_options(cli: &Cli, config: &ChipDbConfig) -> CompileOptions {
    CompileOptions {
        endianness: if cli.be {
            Endianness::Big
        } else {
            config.output.endianness
        },
        verify: cli.verify || config.output.verify,
    }
}

fn default_output(device: Device) -> PathBuf {
    PathBuf::from(format!("chipdb-{}.bin", device.name()))
}

fn write(path: &Path, data: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::write(path, data).map_err(|e| format!("failed to write {}: {e}", path.display()).into())
}
