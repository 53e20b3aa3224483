//! Error types for chip database compilation.

use chipdb_bba::LinkError;
use chipdb_common::Location;
use chipdb_config::ConfigError;
use chipdb_trellis::ProviderError;

/// Errors that abort a compile run.
///
/// Every variant is an integrity violation: no output is produced. Tolerated
/// absences, such as unbonded pads on the bottom row, never surface here.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The device description is inconsistent or could not be queried.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The identifier table is incomplete.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The assembled record stream could not be linked.
    #[error("link failed: {0}")]
    Link(#[from] LinkError),

    /// A package pin or pad away from the bottom row has no matching bel.
    #[error("no bel '{bel}' at {loc} (only bottom-row pads may be missing)")]
    UnresolvedPin {
        /// The pad's tile.
        loc: Location,
        /// The bel name searched for.
        bel: String,
    },

    /// A relative reference in a location type points outside the grid.
    #[error("{what} reference from {from} leaves the grid (offset {rel})")]
    OutsideGrid {
        /// The coordinate the reference was resolved against.
        from: Location,
        /// The relative offset.
        rel: Location,
        /// Kind of reference.
        what: &'static str,
    },

    /// A relative reference names an index that the target location type
    /// does not have.
    #[error("{what} index {index} out of range at {loc} ({count} available)")]
    IndexOutOfRange {
        /// The coordinate the reference resolves to.
        loc: Location,
        /// The referenced index.
        index: u32,
        /// Number of items of that kind at `loc`.
        count: usize,
        /// Kind of reference.
        what: &'static str,
    },

    /// More distinct tile types than a 16-bit index can address.
    #[error("{0} tile types exceed the 16-bit tile type index")]
    TooManyTileTypes(usize),
}
