//! Top-level Project Trellis database loader.
//!
//! Combines the deduplicated routing graph and the package pinout of one
//! device into a [`TrellisDatabase`]. The expected directory structure is:
//!
//! ```text
//! <db_root>/
//! └── ECP5/
//!     └── LFE5U-45F/
//!         ├── dedup_chipdb.json
//!         └── iodb.json
//! ```

use crate::chipdb::DedupChipDb;
use crate::device::Device;
use crate::error::ProviderError;
use crate::iodb::IoDb;
use std::path::{Path, PathBuf};

/// Environment variable naming the database root.
pub const DB_ENV_VAR: &str = "TRELLIS_DB";

/// The loaded device description of a single ECP5 device.
#[derive(Debug, Clone)]
pub struct TrellisDatabase {
    /// The device the database describes.
    pub device: Device,
    /// Deduplicated routing graph, tile names, and global data.
    pub chipdb: DedupChipDb,
    /// Package pinouts and pad metadata.
    pub iodb: IoDb,
    /// The device directory the files were read from.
    pub db_path: PathBuf,
}

impl TrellisDatabase {
    /// Loads both database files of `device` below `db_root`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::DatabaseNotFound`] if the device directory is
    /// missing, and I/O, parse, or consistency errors for the files inside.
    pub fn load(db_root: &Path, device: Device) -> Result<Self, ProviderError> {
        let dev_dir = device_dir(db_root, device);
        if !dev_dir.is_dir() {
            return Err(ProviderError::DatabaseNotFound(dev_dir));
        }

        let chipdb = DedupChipDb::from_json(&read(&dev_dir.join("dedup_chipdb.json"))?)?;
        let iodb = IoDb::from_json(&read(&dev_dir.join("iodb.json"))?)?;

        Ok(Self {
            device,
            chipdb,
            iodb,
            db_path: dev_dir,
        })
    }
}

/// Directory holding the files of `device` below a database root.
pub fn device_dir(db_root: &Path, device: Device) -> PathBuf {
    db_root.join("ECP5").join(device.part_name())
}

fn read(path: &Path) -> Result<String, ProviderError> {
    std::fs::read_to_string(path).map_err(|source| ProviderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the database root.
///
/// Checks in order:
/// 1. The `--db` command-line flag
/// 2. The `TRELLIS_DB` environment variable
/// 3. `database.root` from `chipdb.toml`
///
/// The first source that is set wins, whether or not the path exists.
pub fn resolve_db_root(cli: Option<&Path>, config: Option<&str>) -> Option<PathBuf> {
    pick_db_root(cli, std::env::var(DB_ENV_VAR).ok().as_deref(), config)
}

fn pick_db_root(cli: Option<&Path>, env: Option<&str>, config: Option<&str>) -> Option<PathBuf> {
    cli.map(Path::to_path_buf)
        .or_else(|| env.filter(|e| !e.is_empty()).map(PathBuf::from))
        .or_else(|| config.map(PathBuf::from))
}
