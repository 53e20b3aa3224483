//! `ecp5_bba`, the command-line front end of the ECP5 chip database compiler.
//!
//! Loads the Project Trellis description of one device, compiles it, and
//! writes the binary database. Optional side outputs are a `bba` text dump
//! of the record stream and a JSON record layout.

#![warn(missing_docs)]

mod compile;

use std::path::PathBuf;
use std::process;

use chipdb_trellis::Device;
use clap::{Parser, ValueEnum};

/// Builds the binary chip database of an ECP5 device.
#[derive(Parser, Debug)]
#[command(name = "ecp5_bba", version, about = "ECP5 chip database compiler")]
pub struct Cli {
    /// Target device.
    #[arg(value_enum)]
    pub device: DeviceArg,

    /// Path to the identifier table (`constids.inc`).
    #[arg(short = 'p', long)]
    pub constids: PathBuf,

    /// Output path for the binary database (default: `chipdb-<device>.bin`).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Project Trellis database root (overrides `TRELLIS_DB`).
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Path to a custom `chipdb.toml` configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write a big-endian image.
    #[arg(long)]
    pub be: bool,

    /// Check every relative reference of the routing graph first.
    #[arg(long)]
    pub verify: bool,

    /// Also write the record stream as `bba` text.
    #[arg(long, value_name = "PATH")]
    pub dump: Option<PathBuf>,

    /// Also write the record layout as JSON.
    #[arg(long, value_name = "PATH")]
    pub layout: Option<PathBuf>,

    /// Suppress all output except errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Print per-stage counts and the image hash.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Device selection on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DeviceArg {
    /// LFE5U-25F.
    #[value(name = "25k")]
    Lfe5u25,
    /// LFE5U-45F.
    #[value(name = "45k")]
    Lfe5u45,
    /// LFE5U-85F.
    #[value(name = "85k")]
    Lfe5u85,
}

impl From<DeviceArg> for Device {
    fn from(arg: DeviceArg) -> Self {
        match arg {
            DeviceArg::Lfe5u25 => Device::Lfe5u25f,
            DeviceArg::Lfe5u45 => Device::Lfe5u45f,
            DeviceArg::Lfe5u85 => Device::Lfe5u85f,
        }
    }
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose && !cli.quiet,
        config: cli.config.clone(),
    };

    match compile::run(&cli, &global) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
