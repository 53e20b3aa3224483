//! Error types for configuration and identifier-table loading.

use std::path::PathBuf;

/// Errors that can occur when loading `chipdb.toml` or `constids.inc`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// An identifier-table line is not of the form `X(name)`.
    #[error("malformed identifier on line {line}: '{text}'")]
    MalformedIdentifier {
        /// 1-based line number.
        line: usize,
        /// The offending line.
        text: String,
    },

    /// An identifier is declared twice.
    #[error("duplicate identifier '{name}' on line {line}")]
    DuplicateIdentifier {
        /// 1-based line number of the second declaration.
        line: usize,
        /// The identifier.
        name: String,
    },

    /// The target of a synthetic alias is missing from the table.
    #[error("identifier table lacks '{target}' required for alias '{alias}'")]
    MissingAlias {
        /// The alias being injected.
        alias: &'static str,
        /// The identifier it should point to.
        target: &'static str,
    },

    /// A name was looked up that the identifier table does not define.
    #[error("unknown identifier '{0}'")]
    UnknownIdentifier(String),
}
