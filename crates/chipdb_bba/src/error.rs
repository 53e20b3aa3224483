//! Error types for linking and decoding blobs.

/// Errors detected while linking an assembled record stream.
///
/// Every variant means the emitted stream is inconsistent; no partial image is
/// produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    /// A reference names a label that was never declared.
    #[error("reference `{tag}` targets undefined label '{label}'")]
    UndefinedLabel {
        /// The missing label name.
        label: String,
        /// The field tag of the offending reference.
        tag: String,
    },

    /// The same label name was declared twice.
    #[error("label '{0}' declared more than once")]
    DuplicateLabel(String),

    /// A reference would resolve to its own position, which collides with the
    /// null encoding.
    #[error("reference `{tag}` to '{label}' resolves to its own offset")]
    SelfReference {
        /// The target label.
        label: String,
        /// The field tag of the offending reference.
        tag: String,
    },

    /// Data or labels were emitted outside the `push`/`pop` container.
    #[error("{0} emitted outside of the container scope")]
    OutsideScope(String),

    /// The container scope was opened twice, never opened, or never closed.
    #[error("unbalanced container scope: {0}")]
    UnbalancedScope(String),

    /// A string contains a byte that cannot be stored in the pool.
    #[error("string {value:?} for `{tag}` contains a forbidden character")]
    InvalidString {
        /// The offending string.
        value: String,
        /// The field tag of the string.
        tag: String,
    },

    /// The image does not fit the signed 32-bit reference range.
    #[error("image of {0} bytes exceeds the 32-bit reference range")]
    ImageTooLarge(usize),
}

/// Errors detected while decoding a linked image.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    /// A read extends past the end of the image.
    #[error("read of {len} bytes at offset {offset} is out of bounds")]
    OutOfBounds {
        /// Start offset of the read.
        offset: usize,
        /// Number of bytes requested.
        len: usize,
    },

    /// A string in the pool has no terminating nul byte.
    #[error("unterminated string at offset {0}")]
    UnterminatedString(usize),

    /// A string in the pool is not valid UTF-8.
    #[error("string at offset {0} is not valid UTF-8")]
    InvalidUtf8(usize),

    /// A reference that must point somewhere is null.
    #[error("required reference at offset {0} is null")]
    NullReference(usize),
}
